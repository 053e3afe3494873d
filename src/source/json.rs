//! JSON file vote source
//!
//! Reads exports of the proposal and vote tables. The proposal file holds a
//! single proposal object or an array of them; the votes file holds an array
//! of vote rows. Vote rows that fail to parse are skipped with a warning and
//! counted, so a single bad row does not blank the whole result.

use super::traits::*;
use crate::model::{Proposal, Vote};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum ProposalFile {
    Many(Vec<Proposal>),
    One(Box<Proposal>),
}

/// Vote source backed by two JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    proposals_path: PathBuf,
    votes_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(proposals_path: impl Into<PathBuf>, votes_path: impl Into<PathBuf>) -> Self {
        Self {
            proposals_path: proposals_path.into(),
            votes_path: votes_path.into(),
        }
    }

    async fn read(path: &Path) -> SourceResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn load_proposals(&self) -> SourceResult<Vec<Proposal>> {
        let contents = Self::read(&self.proposals_path).await?;
        let parsed: ProposalFile =
            serde_json::from_str(&contents).map_err(|source| SourceError::Malformed {
                path: self.proposals_path.clone(),
                source,
            })?;

        Ok(match parsed {
            ProposalFile::Many(proposals) => proposals,
            ProposalFile::One(proposal) => vec![*proposal],
        })
    }
}

#[async_trait]
impl VoteSource for JsonFileSource {
    async fn proposal_ids(&self) -> SourceResult<Vec<String>> {
        Ok(self
            .load_proposals()
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect())
    }

    async fn proposal(&self, proposal_id: &str) -> SourceResult<Proposal> {
        self.load_proposals()
            .await?
            .into_iter()
            .find(|p| p.id == proposal_id)
            .ok_or_else(|| SourceError::ProposalNotFound(proposal_id.to_string()))
    }

    async fn votes(&self, proposal_id: &str) -> SourceResult<LoadedVotes> {
        let contents = Self::read(&self.votes_path).await?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&contents).map_err(|source| SourceError::Malformed {
                path: self.votes_path.clone(),
                source,
            })?;

        let total = rows.len();
        let mut loaded = LoadedVotes {
            votes: Vec::with_capacity(total),
            malformed: 0,
        };
        for (row, value) in rows.into_iter().enumerate() {
            // Rows naming another proposal are not ours to count, parseable or not
            let owner = value.get("proposal_id").and_then(serde_json::Value::as_str);
            if owner.is_some_and(|id| id != proposal_id) {
                continue;
            }
            match serde_json::from_value::<Vote>(value) {
                Ok(vote) => loaded.votes.push(vote),
                Err(e) => {
                    warn!(row, error = %e, "skipping malformed vote row");
                    loaded.malformed += 1;
                }
            }
        }

        debug!(
            proposal = proposal_id,
            rows = total,
            loaded = loaded.votes.len(),
            malformed = loaded.malformed,
            "votes loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Choice, VoteType};
    use std::fs;
    use tempfile::TempDir;

    const PROPOSAL: &str = r#"{
        "id": "p1",
        "dao_id": "arbitrum",
        "choices": ["For", "Against", "Abstain"],
        "vote_type": "basic",
        "quorum": 100,
        "start_at": 1700000000,
        "end_at": 1700600000
    }"#;

    const VOTES: &str = r#"[
        {"id": "v1", "proposal_id": "p1", "voter_address": "0x1", "choice": 0, "voting_power": 60, "created_at": 1700000100},
        {"id": "v2", "proposal_id": "p1", "voter_address": "0x2", "choice": "bogus", "voting_power": 10, "created_at": 1700000200},
        {"id": "v3", "proposal_id": "p2", "voter_address": "0x3", "choice": 1, "voting_power": 5, "created_at": 1700000300},
        {"id": "v4", "proposal_id": "p1", "voter_address": "0x4", "choice": 1, "voting_power": 40, "created_at": 1700000400}
    ]"#;

    fn write_files(dir: &TempDir, proposals: &str, votes: &str) -> JsonFileSource {
        let proposals_path = dir.path().join("proposal.json");
        let votes_path = dir.path().join("votes.json");
        fs::write(&proposals_path, proposals).unwrap();
        fs::write(&votes_path, votes).unwrap();
        JsonFileSource::new(proposals_path, votes_path)
    }

    #[tokio::test]
    async fn test_load_single_proposal() {
        let dir = TempDir::new().unwrap();
        let source = write_files(&dir, PROPOSAL, VOTES);

        assert_eq!(source.proposal_ids().await.unwrap(), vec!["p1".to_string()]);

        let proposal = source.proposal("p1").await.unwrap();
        assert_eq!(proposal.vote_type, VoteType::Basic);
        assert_eq!(proposal.quorum, 100.0);
    }

    #[tokio::test]
    async fn test_load_proposal_array() {
        let dir = TempDir::new().unwrap();
        let proposals = format!("[{}, {}]", PROPOSAL, PROPOSAL.replace("\"p1\"", "\"p2\""));
        let source = write_files(&dir, &proposals, VOTES);

        let ids = source.proposal_ids().await.unwrap();
        assert_eq!(ids, vec!["p1".to_string(), "p2".to_string()]);
        assert!(matches!(
            resolve_proposal_id(&source, None).await,
            Err(SourceError::AmbiguousProposal(2))
        ));
        assert_eq!(resolve_proposal_id(&source, Some("p2")).await.unwrap(), "p2");
    }

    #[tokio::test]
    async fn test_votes_filtered_and_bad_rows_skipped() {
        let dir = TempDir::new().unwrap();
        let source = write_files(&dir, PROPOSAL, VOTES);

        let loaded = source.votes("p1").await.unwrap();
        assert_eq!(loaded.votes.len(), 2);
        assert_eq!(loaded.votes[0].choice, Choice::Single(0));
        assert_eq!(loaded.votes[1].id, "v4");
        assert_eq!(loaded.malformed, 1);

        // the bogus row belongs to p1, not p2
        let loaded = source.votes("p2").await.unwrap();
        assert_eq!(loaded.votes.len(), 1);
        assert_eq!(loaded.malformed, 0);
    }

    #[tokio::test]
    async fn test_malformed_rows_reach_skipped_count() {
        let dir = TempDir::new().unwrap();
        let source = write_files(&dir, PROPOSAL, VOTES);

        let (_, view) = crate::source::load_results(&source, "p1", &Default::default())
            .await
            .unwrap();
        let results = view.visible().unwrap();
        assert_eq!(results.counted_votes, 2);
        assert_eq!(results.skipped_votes, 1);
        assert_eq!(results.total_voting_power, 100.0);
    }

    #[tokio::test]
    async fn test_missing_proposal() {
        let dir = TempDir::new().unwrap();
        let source = write_files(&dir, PROPOSAL, VOTES);

        assert!(matches!(
            source.proposal("nope").await,
            Err(SourceError::ProposalNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = JsonFileSource::new(dir.path().join("a.json"), dir.path().join("b.json"));

        assert!(matches!(
            source.proposal_ids().await,
            Err(SourceError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_votes_file() {
        let dir = TempDir::new().unwrap();
        let source = write_files(&dir, PROPOSAL, "{not json");

        assert!(matches!(
            source.votes("p1").await,
            Err(SourceError::Malformed { .. })
        ));
    }
}
