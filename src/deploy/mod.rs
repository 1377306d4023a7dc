//! Publishing the project tree to a GitHub repository, one contents API
//! call per file.

pub mod github;

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use crate::app::{AutopilotError, Result};
use crate::config::DeployConfig;

pub use github::{GithubClient, RepoStatus, Target, Upsert};

const PROGRESS_EVERY: usize = 20;

/// A file to upload: absolute location and forward-slash relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub full: PathBuf,
    pub rel: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub repo: RepoStatus,
    pub uploaded: usize,
    pub created: usize,
    pub updated: usize,
}

/// Split `owner/repo` into its two parts.
pub fn parse_repo(full: &str) -> Result<(&str, &str)> {
    let invalid = || AutopilotError::MissingInput(format!("repo must be like owner/repo, got {:?}", full));
    let (owner, repo) = full.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }
    Ok((owner, repo))
}

/// Ignore entries ending in `/` match a directory and everything below it;
/// other entries match one path exactly.
pub fn should_ignore(rel: &str, ignore: &[String]) -> bool {
    let rel = rel.replace('\\', "/");
    ignore.iter().any(|pattern| {
        if pattern.ends_with('/') {
            rel.starts_with(pattern.as_str()) || format!("{}/", rel) == *pattern
        } else {
            rel == *pattern
        }
    })
}

/// Every file below `root` not excluded by `ignore`, sorted by relative path.
pub fn collect_files(root: &Path, ignore: &[String]) -> Result<Vec<ProjectFile>> {
    let mut files = Vec::new();
    walk(root, root, ignore, &mut files)?;
    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(files)
}

fn walk(root: &Path, dir: &Path, ignore: &[String], out: &mut Vec<ProjectFile>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let full = entry.path();
        let rel = match full.strip_prefix(root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => continue,
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if !should_ignore(&format!("{}/", rel), ignore) {
                walk(root, &full, ignore, out)?;
            }
        } else if file_type.is_file() && !should_ignore(&rel, ignore) {
            out.push(ProjectFile { full, rel });
        }
    }
    Ok(())
}

/// Upload the project tree at `root` to `target`.
pub async fn deploy(
    client: &GithubClient,
    config: &DeployConfig,
    root: &Path,
    target: &Target<'_>,
    create_repo: bool,
) -> Result<DeployReport> {
    info!(owner = target.owner, repo = target.repo, "Checking repo");
    let repo = client
        .ensure_repo(target.owner, target.repo, create_repo)
        .await?;
    match &repo {
        RepoStatus::Exists => info!("Repo exists"),
        RepoStatus::Created(name) => info!("Created repo: {}", name),
    }

    let files = collect_files(root, &config.ignore)?;
    info!("Found {} file(s) to upload", files.len());

    let mut report = DeployReport {
        repo,
        uploaded: 0,
        created: 0,
        updated: 0,
    };
    for (i, file) in files.iter().enumerate() {
        let content = STANDARD.encode(fs::read(&file.full)?);
        match client
            .upsert_file(target, &file.rel, &content, &config.commit_message)
            .await?
        {
            Upsert::Created => report.created += 1,
            Upsert::Updated => report.updated += 1,
        }
        report.uploaded += 1;

        if (i + 1) % PROGRESS_EVERY == 0 {
            info!("Uploaded {}/{}", i + 1, files.len());
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CannedServer;

    fn default_ignore() -> Vec<String> {
        DeployConfig::default().ignore
    }

    #[test]
    fn test_parse_repo() {
        assert_eq!(parse_repo("octo/site").unwrap(), ("octo", "site"));
        assert_eq!(parse_repo(" octo/site ").unwrap(), ("octo", "site"));
        assert!(parse_repo("site").is_err());
        assert!(parse_repo("/site").is_err());
        assert!(parse_repo("octo/").is_err());
        assert!(parse_repo("a/b/c").is_err());
    }

    #[test]
    fn test_should_ignore() {
        let ignore = default_ignore();
        assert!(should_ignore("node_modules/x/index.js", &ignore));
        assert!(should_ignore("dist/", &ignore));
        assert!(should_ignore(".git/HEAD", &ignore));
        assert!(should_ignore(".env", &ignore));
        assert!(should_ignore("workspace\\notes.txt", &ignore));

        assert!(!should_ignore(".env.example", &ignore));
        assert!(!should_ignore("src/dist/app.js", &ignore));
        assert!(!should_ignore("landing.json", &ignore));
    }

    #[test]
    fn test_collect_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/images")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("landing.json"), "{}").unwrap();
        fs::write(root.join(".env"), "TOKEN=x").unwrap();
        fs::write(root.join("src/images/img-001.jpg"), b"jpg").unwrap();
        fs::write(root.join("src/app.js"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join("dist/index.html"), "").unwrap();

        let files = collect_files(root, &default_ignore()).unwrap();
        let rels: Vec<&str> = files.iter().map(|f| f.rel.as_str()).collect();
        assert_eq!(rels, vec!["landing.json", "src/app.js", "src/images/img-001.jpg"]);
        assert_eq!(files[2].full, root.join("src/images/img-001.jpg"));
    }

    #[tokio::test]
    async fn test_deploy_uploads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 0..21 {
            fs::write(root.join(format!("file-{:02}.txt", i)), format!("file {}", i)).unwrap();
        }
        fs::write(root.join(".env"), "TOKEN=x").unwrap();

        let server = CannedServer::start(|req| match (req.method.as_str(), req.path.as_str()) {
            ("GET", "/repos/octo/site") => (200, "{}".into()),
            ("GET", path) if path.starts_with("/repos/octo/site/contents/file-03.txt") => {
                (200, r#"{"sha":"old"}"#.into())
            }
            ("GET", _) => (404, r#"{"message":"Not Found"}"#.into()),
            _ => (200, "{}".into()),
        })
        .await;

        let config = DeployConfig {
            api_base: server.base.clone(),
            ..DeployConfig::default()
        };
        let client = GithubClient::new(&config, "ghp_test").unwrap();
        let target = Target {
            owner: "octo",
            repo: "site",
            branch: "main",
        };

        let report = deploy(&client, &config, root, &target, false).await.unwrap();
        assert_eq!(
            report,
            DeployReport {
                repo: RepoStatus::Exists,
                uploaded: 21,
                created: 20,
                updated: 1,
            }
        );

        let puts: Vec<_> = server
            .requests()
            .into_iter()
            .filter(|r| r.method == "PUT")
            .collect();
        assert_eq!(puts.len(), 21);
        assert_eq!(puts[0].path, "/repos/octo/site/contents/file-00.txt");
        assert_eq!(puts[0].json()["content"], STANDARD.encode("file 0"));
        assert_eq!(puts[0].json()["message"], config.commit_message.as_str());
        assert_eq!(puts[3].json()["sha"], "old");
        assert!(puts.iter().all(|r| !r.path.contains(".env")));
    }

    #[tokio::test]
    async fn test_deploy_stops_at_missing_repo() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("landing.json"), "{}").unwrap();

        let server = CannedServer::start(|_| (404, r#"{"message":"Not Found"}"#.into())).await;
        let config = DeployConfig {
            api_base: server.base.clone(),
            ..DeployConfig::default()
        };
        let client = GithubClient::new(&config, "ghp_test").unwrap();
        let target = Target {
            owner: "octo",
            repo: "site",
            branch: "main",
        };

        let err = deploy(&client, &config, dir.path(), &target, false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(server.requests().len(), 1);
    }
}
