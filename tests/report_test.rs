use anyhow::Result;
use branch_report::git::{Branch, GitRepository};
use branch_report::report::{render, BranchSummary, RenderContext, RenderOptions};
use chrono::{DateTime, FixedOffset};
use git2::{Repository, Signature, Time};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test setup that creates a temporary git repository with remote-tracking
/// branches built from local commits.
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
    commits: Vec<git2::Oid>,
    next_time: i64,
}

impl TestRepo {
    fn new() -> Result<Self> {
        // Create temporary directory
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().join("project");
        fs::create_dir(&repo_path)?;

        // Initialize git repository
        let repo = Repository::init(&repo_path)?;

        // Configure git user for commits
        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            commits: Vec::new(),
            // Commit times must be strictly increasing so that the
            // newest-first ordering of walks is deterministic.
            next_time: 1_400_000_000,
        })
    }

    fn add_commit(&mut self, message: &str) -> Result<git2::Oid> {
        self.add_commit_on(message, self.commits.last().copied())
    }

    fn add_commit_on(&mut self, message: &str, parent: Option<git2::Oid>) -> Result<git2::Oid> {
        // Create a test file with unique content
        let file_path = self.repo_path.join("test.txt");
        fs::write(&file_path, format!("{message}\n{}\n", self.next_time))?;

        // Add file to index
        let mut index = self.repo.index()?;
        index.add_path(std::path::Path::new("test.txt"))?;
        index.write()?;

        // Create commit with a fixed, increasing author time
        let time = Time::new(self.next_time, 0);
        self.next_time += 60;
        let signature = Signature::new("Test User", "test@example.com", &time)?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = match parent {
            Some(oid) => Some(self.repo.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

        let commit_id =
            self.repo
                .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        self.commits.push(commit_id);
        Ok(commit_id)
    }

    /// Points `refs/remotes/origin/<name>` at the given commit.
    fn set_remote_branch(&self, name: &str, oid: git2::Oid) -> Result<()> {
        self.repo
            .reference(&format!("refs/remotes/origin/{name}"), oid, true, "test")?;
        Ok(())
    }

    fn open(&self) -> Result<GitRepository> {
        GitRepository::open_at(&self.repo_path)
    }
}

fn test_now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2014-05-20T12:00:00+00:00").unwrap()
}

/// master: A-B; feature: A-B-C-D; merged: A.
fn repo_with_branches() -> Result<TestRepo> {
    let mut test_repo = TestRepo::new()?;

    let a = test_repo.add_commit("Initial commit")?;
    let b = test_repo.add_commit("Add base feature")?;
    let _c = test_repo.add_commit("Start new work")?;
    let d = test_repo.add_commit("Finish new work")?;

    test_repo.set_remote_branch("master", b)?;
    test_repo.set_remote_branch("feature", d)?;
    test_repo.set_remote_branch("merged", a)?;

    Ok(test_repo)
}

#[test]
fn branches_on_remote_lists_remote_branches() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    let mut names: Vec<String> = repo
        .branches_on_remote("origin")?
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    names.sort();

    assert_eq!(names, vec!["feature", "master", "merged"]);
    Ok(())
}

#[test]
fn branches_on_remote_excludes_symbolic_head() -> Result<()> {
    let test_repo = repo_with_branches()?;
    test_repo.repo.reference_symbolic(
        "refs/remotes/origin/HEAD",
        "refs/remotes/origin/master",
        true,
        "test",
    )?;
    let repo = test_repo.open()?;

    let branches = repo.branches_on_remote("origin")?;
    assert!(branches.iter().all(|b| b.name() != "HEAD"));
    assert_eq!(branches.len(), 3);
    Ok(())
}

#[test]
fn branch_tip_carries_commit_data() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    let feature = Branch::new(&repo, "origin", "feature");
    let tip = feature.tip()?;

    assert_eq!(tip.hash(), test_repo.commits[3].to_string());
    assert_eq!(tip.author(), "Test User");
    assert_eq!(tip.email(), "test@example.com");
    assert_eq!(tip.subject(), "Finish new work");
    assert_eq!(feature.full_name(), "origin/feature");
    Ok(())
}

#[test]
fn unmerged_commits_are_counted_and_listed_newest_first() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    let master = Branch::new(&repo, "origin", "master");
    let feature = Branch::new(&repo, "origin", "feature");

    assert_eq!(feature.num_of_unmerged_commits(&master)?, 2);
    assert!(feature.has_unmerged_commits(&master)?);

    let commits = feature.unmerged_commits(&master, None)?;
    let subjects: Vec<&str> = commits.iter().map(|c| c.subject()).collect();
    assert_eq!(subjects, vec!["Finish new work", "Start new work"]);
    Ok(())
}

#[test]
fn merged_branch_has_no_unmerged_commits() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    let master = Branch::new(&repo, "origin", "master");
    let merged = Branch::new(&repo, "origin", "merged");

    assert_eq!(merged.num_of_unmerged_commits(&master)?, 0);
    assert!(!merged.has_unmerged_commits(&master)?);
    assert!(merged.unmerged_commits(&master, None)?.is_empty());
    Ok(())
}

#[test]
fn has_unmerged_commits_agrees_with_count() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    let master = Branch::new(&repo, "origin", "master");
    for branch in repo.branches_on_remote("origin")? {
        assert_eq!(
            branch.has_unmerged_commits(&master)?,
            branch.num_of_unmerged_commits(&master)? > 0
        );
    }
    Ok(())
}

#[test]
fn limit_bounds_the_list_but_not_the_count() -> Result<()> {
    let mut test_repo = TestRepo::new()?;

    let base = test_repo.add_commit("Initial commit")?;
    test_repo.set_remote_branch("master", base)?;
    for i in 1..=5 {
        test_repo.add_commit(&format!("Work {i}"))?;
    }
    let tip = *test_repo.commits.last().unwrap();
    test_repo.set_remote_branch("feature", tip)?;

    let repo = test_repo.open()?;
    let master = Branch::new(&repo, "origin", "master");
    let feature = Branch::new(&repo, "origin", "feature");

    assert_eq!(feature.num_of_unmerged_commits(&master)?, 5);
    assert!(feature.has_more_unmerged_commits_than(&master, 3)?);
    assert!(!feature.has_more_unmerged_commits_than(&master, 5)?);

    let limited = feature.unmerged_commits(&master, Some(3))?;
    let subjects: Vec<&str> = limited.iter().map(|c| c.subject()).collect();
    assert_eq!(subjects, vec!["Work 5", "Work 4", "Work 3"]);
    Ok(())
}

#[test]
fn summary_keeps_true_total_with_limited_list() -> Result<()> {
    let mut test_repo = TestRepo::new()?;

    let base = test_repo.add_commit("Initial commit")?;
    test_repo.set_remote_branch("master", base)?;
    for i in 1..=15 {
        test_repo.add_commit(&format!("Work {i}"))?;
    }
    test_repo.set_remote_branch("feature", *test_repo.commits.last().unwrap())?;

    let repo = test_repo.open()?;
    let master = Branch::new(&repo, "origin", "master");
    let feature = Branch::new(&repo, "origin", "feature");

    let summary = BranchSummary::collect(&feature, &master, test_now(), Some(10))?;
    assert_eq!(summary.total_unmerged, 15);
    assert_eq!(summary.unmerged.len(), 10);
    assert_eq!(summary.unmerged[0].subject(), "Work 15");

    let page = render(&RenderContext {
        repo_name: "project".to_string(),
        remote: "origin".to_string(),
        master_branch: "master".to_string(),
        shown_branches: vec![summary],
        ignored_branches: vec![],
        options: RenderOptions::new(None, None, Some(10)).unwrap(),
        last_update: None,
    });
    assert!(page.contains("Unmerged commits (showing the last 10 out of 15)"));
    Ok(())
}

#[test]
fn report_renders_repository_snapshot() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    assert_eq!(repo.name()?, "project");

    let master = Branch::new(&repo, "origin", "master");
    let now = test_now();
    let shown = vec![
        BranchSummary::collect(&Branch::new(&repo, "origin", "feature"), &master, now, None)?,
        BranchSummary::collect(&Branch::new(&repo, "origin", "merged"), &master, now, None)?,
    ];

    let page = render(&RenderContext {
        repo_name: repo.name()?,
        remote: "origin".to_string(),
        master_branch: "master".to_string(),
        shown_branches: shown,
        ignored_branches: vec!["old-feature".to_string(), "spike".to_string()],
        options: RenderOptions::default(),
        last_update: None,
    });

    assert!(page.contains("project"));
    assert!(page.contains("feature"));
    assert!(page.contains("Unmerged commits (2)"));
    assert!(page.contains("Finish new work"));
    assert!(page.contains("No unmerged commits. This branch can be removed."));
    assert!(page.contains("Ignored Branches"));
    assert!(page.contains("<li>old-feature</li>"));
    assert!(page.contains("<li>spike</li>"));
    Ok(())
}

#[test]
fn date_of_last_update_requires_a_fetch() -> Result<()> {
    let test_repo = repo_with_branches()?;
    let repo = test_repo.open()?;

    // Never fetched: no FETCH_HEAD yet
    assert!(repo.date_of_last_update().is_err());

    fs::write(test_repo.repo_path.join(".git").join("FETCH_HEAD"), "")?;
    assert!(repo.date_of_last_update().is_ok());
    Ok(())
}
