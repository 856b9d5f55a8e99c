use chrono::NaiveDate;
use heritage_core::db::{open_db, open_db_in_memory};
use heritage_core::{
    initial_members, FamilyMember, FamilyService, FamilyServiceError, MemberRepoResult,
    MemberRepository, MessageCatalog, SqliteMemberRepository, TreeLayout,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn member(id: &str) -> FamilyMember {
    FamilyMember::with_id(id, format!("Member {id}"), date("1950-01-01"), "Minsk")
}

/// Repository stub whose writes always fail, for divergence tests.
struct BrokenRepo;

impl MemberRepository for BrokenRepo {
    fn replace_all(&self, _members: &[FamilyMember]) -> MemberRepoResult<()> {
        Err(heritage_core::MemberRepoError::InvalidData(
            "disk unavailable".to_string(),
        ))
    }

    fn load_all(&self) -> MemberRepoResult<Vec<FamilyMember>> {
        Ok(Vec::new())
    }

    fn count(&self) -> MemberRepoResult<u64> {
        Ok(0)
    }
}

#[test]
fn seed_if_empty_installs_starter_family_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut service = FamilyService::load(repo).unwrap();

    assert!(service.seed_if_empty(initial_members().unwrap()).unwrap());
    assert_eq!(service.members().len(), 5);

    // Second call is a no-op on a populated session.
    assert!(!service.seed_if_empty(initial_members().unwrap()).unwrap());
    assert_eq!(service.members().len(), 5);
}

#[test]
fn save_member_persists_and_updates_session() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut service = FamilyService::load(repo).unwrap();
    service.seed_if_empty(vec![member("p")]).unwrap();

    let mut child = member("c");
    child.parents = vec!["p".to_string()];
    service.save_member(child).unwrap();

    assert_eq!(service.members().len(), 2);
    assert_eq!(
        service.get_member("p").unwrap().children,
        vec!["c".to_string()]
    );

    // The reconciled collection reached storage, not just the session.
    let verify_repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let stored = verify_repo.load_all().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].children, vec!["c".to_string()]);
}

#[test]
fn save_member_rejects_invalid_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut service = FamilyService::load(repo).unwrap();

    let mut invalid = member("a");
    invalid.spouse = Some("a".to_string());
    let err = service.save_member(invalid).unwrap_err();
    assert!(matches!(err, FamilyServiceError::Validation(_)));
    assert!(service.members().is_empty());
}

#[test]
fn failed_persistence_leaves_session_state_untouched() {
    let mut service = FamilyService::load(BrokenRepo).unwrap();

    let err = service.save_member(member("a")).unwrap_err();
    assert!(matches!(err, FamilyServiceError::Repo(_)));
    assert!(service.members().is_empty());
}

#[test]
fn save_translated_member_strips_untouched_translations() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut service = FamilyService::load(repo).unwrap();
    service.seed_if_empty(initial_members().unwrap()).unwrap();

    let canonical = MessageCatalog::load_embedded("en");
    let ru = MessageCatalog::load_embedded("ru");

    // The user edits the bio of a member displayed in Russian.
    let mut edited = heritage_core::localize_member(&ru, service.get_member("2").unwrap());
    edited.bio = "Новая биография.".to_string();
    edited.overrides.bio = true;

    service.save_translated_member(&canonical, edited).unwrap();

    let saved = service.get_member("2").unwrap();
    // Untouched fields fall back to canonical English text.
    assert_eq!(saved.name, "Maria Ivanovna Slizh");
    assert_eq!(saved.birthplace, "Izhevsk, Russia");
    // The deliberate edit survives, flagged as overridden.
    assert_eq!(saved.bio, "Новая биография.");
    assert!(saved.overrides.bio);
}

#[test]
fn tree_reflects_current_session_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut service = FamilyService::load(repo).unwrap();

    assert_eq!(service.tree(), TreeLayout::Empty);

    service.seed_if_empty(initial_members().unwrap()).unwrap();
    let TreeLayout::Forest(trees) = service.tree() else {
        panic!("expected forest");
    };
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].member_id, "1");
    assert_eq!(trees[0].spouse_id.as_deref(), Some("2"));
}

#[test]
fn reload_adopts_stored_state() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("heritage.db");

    let conn = open_db(&db_path).unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();
    let mut service = FamilyService::load(repo).unwrap();
    service.seed_if_empty(vec![member("a")]).unwrap();

    // A second connection writes a different collection behind the session.
    let other_conn = open_db(&db_path).unwrap();
    let other_repo = SqliteMemberRepository::try_new(&other_conn).unwrap();
    other_repo
        .replace_all(&[member("a"), member("b")])
        .unwrap();

    assert_eq!(service.members().len(), 1);
    service.reload().unwrap();
    assert_eq!(service.members().len(), 2);
}
