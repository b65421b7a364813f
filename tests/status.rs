use branchstat::{Repository, StatusConfig};
use tempfile::TempDir;

fn sig() -> git2::Signature<'static> {
    git2::Signature::now("test", "test@example.com").unwrap()
}

/// Bare-bones fixture: one commit on master, checked out.
fn fixture() -> (TempDir, git2::Repository) {
    let tmp = TempDir::new().unwrap();
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("master");
    let repo = git2::Repository::init_opts(tmp.path(), &opts).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    {
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig(), &sig(), "initial", &tree, &[])
            .unwrap();
    }
    (tmp, repo)
}

fn commit_on(repo: &git2::Repository, refname: &str, message: &str) -> git2::Oid {
    let parent = repo
        .find_reference(refname)
        .unwrap()
        .peel_to_commit()
        .unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(Some(refname), &sig(), &sig(), message, &tree, &[&parent])
        .unwrap()
}

fn branch_at_head(repo: &git2::Repository, name: &str) -> git2::Oid {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch(name, &head, false).unwrap();
    head.id()
}

#[test]
fn batch_statuses_cover_local_and_canonical_remote_refs() {
    let (tmp, raw) = fixture();
    let base = branch_at_head(&raw, "feature");
    raw.remote("origin", "https://example.com/repo.git").unwrap();
    raw.reference("refs/remotes/origin/feature", base, true, "test")
        .unwrap();
    // origin/HEAD is symbolic and must not show up as a branch.
    raw.reference_symbolic(
        "refs/remotes/origin/HEAD",
        "refs/remotes/origin/feature",
        true,
        "test",
    )
    .unwrap();

    let repo = Repository::open(tmp.path()).unwrap();

    let local_only = repo.branch_statuses(false).unwrap();
    let mut names: Vec<&str> = local_only.iter().map(|s| s.full_name()).collect();
    names.sort_unstable();
    assert_eq!(names, ["refs/heads/feature", "refs/heads/master"]);

    let all = repo.branch_statuses(true).unwrap();
    let mut names: Vec<&str> = all.iter().map(|s| s.full_name()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "refs/heads/feature",
            "refs/heads/master",
            "refs/remotes/origin/feature",
        ]
    );

    let current: Vec<&str> = all
        .iter()
        .filter(|s| s.is_current_branch())
        .map(|s| s.full_name())
        .collect();
    assert_eq!(current, ["refs/heads/master"]);
}

#[test]
fn push_gate_scenario() {
    // A feature branch tracking origin/feature, two commits ahead, while an
    // older feature branch has already been merged into master.
    let (tmp, raw) = fixture();
    let base = branch_at_head(&raw, "feature");
    branch_at_head(&raw, "done");
    commit_on(&raw, "refs/heads/master", "merge done work");

    raw.remote("origin", "https://example.com/repo.git").unwrap();
    raw.reference("refs/remotes/origin/feature", base, true, "test")
        .unwrap();
    let mut config = raw.config().unwrap();
    config.set_str("branch.feature.remote", "origin").unwrap();
    config
        .set_str("branch.feature.merge", "refs/heads/feature")
        .unwrap();
    commit_on(&raw, "refs/heads/feature", "wip one");
    commit_on(&raw, "refs/heads/feature", "wip two");

    let repo = Repository::open(tmp.path()).unwrap();

    let feature = repo.branch_status("refs/heads/feature").unwrap();
    assert!(feature.has_unpushed_commits());
    assert!(!feature.has_remote_commits());
    assert!(feature.has_tracked_ref());
    assert!(!feature.is_remote_deleted());
    assert!(!feature.is_merged());

    let done = repo.branch_status("refs/heads/done").unwrap();
    assert!(done.is_merged());
    assert!(!done.has_unpushed_commits());

    let master = repo.branch_status("refs/heads/master").unwrap();
    assert!(master.is_merged());
    assert!(master.is_current_branch());
}

#[test]
fn canonical_remote_name_is_configurable() {
    let (tmp, raw) = fixture();
    let base = branch_at_head(&raw, "feature");
    raw.remote("upstream", "https://example.com/repo.git")
        .unwrap();
    raw.reference("refs/remotes/upstream/feature", base, true, "test")
        .unwrap();

    let config = StatusConfig {
        remote: "upstream".to_string(),
        ..Default::default()
    };
    let repo = Repository::open_with(tmp.path(), config).unwrap();

    let remote = repo
        .branch_status("refs/remotes/upstream/feature")
        .unwrap();
    assert!(remote.is_remote());
    assert_eq!(remote.short_name(), "feature");
    assert!(remote.has_tracked_ref());

    let local = repo.branch_status("refs/heads/feature").unwrap();
    assert!(local.has_remote_ref());
    assert!(local.has_tracked_ref());
    assert_eq!(local.remote_ref_name(), "refs/remotes/upstream/feature");
}
