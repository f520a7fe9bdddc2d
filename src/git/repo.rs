use crate::error::{Result, ScopeError};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use gix::{ObjectId, Repository};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted exactly at `path`. Parent directories are
    /// not searched, so a plain folder inside another checkout is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = gix::open(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name of the checked out branch, or "HEAD" when detached.
    pub fn branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head
            .referent_name()
            .map(|name| name.shorten().to_string())
            .unwrap_or_else(|| "HEAD".to_string()))
    }

    /// Commit time of `HEAD`, `None` for a repository without commits.
    pub fn last_commit_time(&self) -> Result<Option<DateTime<Utc>>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            return Ok(None);
        }
        let commit = head.peel_to_commit_in_place()?;
        let secs = commit.time()?.seconds;
        let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| ScopeError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
        Ok(Some(timestamp))
    }

    /// Subject line of the commit at `HEAD`.
    pub fn last_commit_subject(&self) -> Result<String> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            return Err(ScopeError::GitRepo(format!(
                "{} has no commits",
                self.path.display()
            )));
        }
        let commit = head.peel_to_commit_in_place()?;
        let message = commit.message()?;
        Ok(message.title.to_string().trim().to_string())
    }

    /// Author dates of every commit reachable from `HEAD` committed on or
    /// after `since`. The cutoff uses committer time; the returned date is the
    /// author time in the author's own timezone. Ancestors of a commit
    /// committed before `since` are not visited.
    pub fn commit_dates_since(&self, since: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            return Ok(Vec::new());
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut dates = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let committed = commit.time()?;
            if local_date(committed.seconds, committed.offset)? < since {
                continue;
            }

            let authored = commit
                .author()?
                .time()
                .map_err(|e| ScopeError::InvalidDate(format!("Bad author time in {commit_id}: {e}")))?;
            dates.push(local_date(authored.seconds, authored.offset)?);

            for pid in commit.parent_ids() {
                stack.push_back(pid.detach());
            }
        }

        Ok(dates)
    }
}

fn local_date(secs: i64, offset: i32) -> Result<NaiveDate> {
    let utc = DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| ScopeError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
    let tz = FixedOffset::east_opt(offset)
        .ok_or_else(|| ScopeError::InvalidDate(format!("Invalid timezone offset: {offset}")))?;
    Ok(utc.with_timezone(&tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn local_date_honours_offset() {
        // 2024-01-01T23:30:00Z
        let secs = 1_704_151_800;
        assert_eq!(
            local_date(secs, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            local_date(secs, 3600).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(
            local_date(secs, -5 * 3600).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    fn has_git() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str], dates: Option<(&str, &str)>) {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com");
        if let Some((author, committer)) = dates {
            cmd.env("GIT_AUTHOR_DATE", author)
                .env("GIT_COMMITTER_DATE", committer);
        }
        let status = cmd.status().unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn commit_dates_report_author_date() {
        if !has_git() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        git(path, &["init", "-q"], None);
        std::fs::write(path.join("a.txt"), "a").unwrap();
        git(path, &["add", "."], None);
        git(
            path,
            &["commit", "-q", "-m", "rebased"],
            Some(("2024-01-05T10:00:00+00:00", "2024-01-09T10:00:00+00:00")),
        );

        let repo = GitRepo::open(path).unwrap();
        let dates = repo
            .commit_dates_since(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap();
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()]);

        // cutoff follows the committer date
        let after_author = repo
            .commit_dates_since(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())
            .unwrap();
        assert_eq!(after_author, vec![NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()]);

        let after_commit = repo
            .commit_dates_since(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
            .unwrap();
        assert!(after_commit.is_empty());
    }

    #[test]
    fn open_rejects_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GitRepo::open(dir.path()).is_err());
    }
}
