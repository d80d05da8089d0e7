use crate::error::{ReleaseError, Result};
use crate::git::{subject_line, CommitInfo, Tagger};
use git2::{
    AutotagOption, Cred, CredentialType, ErrorCode, FetchOptions, Oid, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Signature, Sort,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree (None for bare repositories)
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn tag_commit_oid(&self, tag_name: &str) -> Result<Oid> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let commit = reference.peel_to_commit().map_err(|e| {
                    ReleaseError::tag(format!("Cannot peel tag '{}' to a commit: {}", tag_name, e))
                })?;
                Ok(commit.id())
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                Err(ReleaseError::tag(format!("Tag '{}' not found", tag_name)))
            }
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot find tag '{}': {}",
                tag_name, e
            ))),
        }
    }
}

/// Token used for HTTPS remotes, as provided to GitHub Actions jobs.
fn github_token() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty())
}

fn ssh_key_candidates() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    ["id_ed25519", "id_rsa", "id_ecdsa"]
        .iter()
        .map(|name| home.join(".ssh").join(name))
        .filter(|path| path.exists())
        .collect()
}

/// Next ssh credential to offer: the agent once, then each key file once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SshAttempt {
    Agent,
    Key(usize),
}

#[derive(Debug, Default)]
struct SshCursor {
    agent_tried: bool,
    next_key: usize,
}

impl SshCursor {
    fn next(&mut self, key_count: usize) -> Option<SshAttempt> {
        if !self.agent_tried {
            self.agent_tried = true;
            return Some(SshAttempt::Agent);
        }
        if self.next_key < key_count {
            self.next_key += 1;
            return Some(SshAttempt::Key(self.next_key - 1));
        }
        None
    }
}

/// Callbacks that authenticate remote operations.
///
/// Tries, in order: a GitHub token over HTTPS, the ssh agent, ssh keys in ~/.ssh, then
/// git's default credentials. libgit2 calls back once per rejected attempt; each ssh
/// candidate is offered once and the total number of attempts is bounded.
fn credential_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0usize;
    let mut ssh = SshCursor::default();

    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > 5 {
            return Err(git2::Error::from_str(
                "authentication failed: no usable credentials",
            ));
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(token) = github_token() {
                return Cred::userpass_plaintext("x-access-token", &token);
            }
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            let user = username_from_url.unwrap_or("git");
            let keys = ssh_key_candidates();
            while let Some(attempt) = ssh.next(keys.len()) {
                match attempt {
                    SshAttempt::Agent => {
                        if let Ok(cred) = Cred::ssh_key_from_agent(user) {
                            return Ok(cred);
                        }
                    }
                    SshAttempt::Key(index) => return Cred::ssh_key(user, None, &keys[index], None),
                }
            }
        }

        Cred::default()
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn commits_since(&self, since_tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(tag) = since_tag {
            revwalk.hide(self.tag_commit_oid(tag)?)?;
        }

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let short_id = commit.as_object().short_id()?;
            let short_hash = short_id
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| oid.to_string().chars().take(7).collect());

            commits.push(CommitInfo {
                hash: oid.to_string(),
                short_hash,
                subject: subject_line(commit.message().unwrap_or("(empty message)")),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        Ok(commits)
    }

    fn create_annotated_tag(&self, name: &str, message: &str, tagger: &Tagger) -> Result<String> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| ReleaseError::tag(format!("Cannot resolve HEAD: {}", e)))?;

        let signature = Signature::now(&tagger.name, &tagger.email)?;

        let oid = self
            .repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| {
                if e.code() == ErrorCode::Exists {
                    ReleaseError::TagCollision(vec![name.to_string()])
                } else {
                    ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e))
                }
            })?;

        tracing::debug!(tag = name, target = %head.id(), "created annotated tag");
        Ok(oid.to_string())
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        if tag_names.is_empty() {
            return Ok(());
        }

        let mut git_remote = self.repo.find_remote(remote).map_err(|e| {
            ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e))
        })?;

        let rejected = RefCell::new(Vec::new());
        {
            let mut callbacks = credential_callbacks();
            callbacks.push_update_reference(|refname, status| {
                if let Some(status) = status {
                    rejected.borrow_mut().push(format!("{} ({})", refname, status));
                }
                Ok(())
            });

            let mut push_options = PushOptions::new();
            push_options.remote_callbacks(callbacks);

            let refspecs: Vec<String> = tag_names
                .iter()
                .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
                .collect();

            git_remote
                .push(&refspecs, Some(&mut push_options))
                .map_err(|e| ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)))?;
        }

        let rejected = rejected.into_inner();
        if !rejected.is_empty() {
            return Err(ReleaseError::remote(format!(
                "Remote '{}' rejected {}",
                remote,
                rejected.join(", ")
            )));
        }

        Ok(())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut git_remote = self.repo.find_remote(remote).map_err(|e| {
            ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e))
        })?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());
        fetch_options.download_tags(AutotagOption::All);

        git_remote
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)
            .map_err(|e| ReleaseError::remote(format!("Fetch from '{}' failed: {}", remote, e)))?;

        Ok(())
    }
}
