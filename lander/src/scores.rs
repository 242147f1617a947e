//! Episode scores as CSV.
use anyhow::Result;
use csv::WriterBuilder;
use lander_core::EpisodeRecord;
use serde::Serialize;
use std::{fs::File, path::Path};

#[derive(Debug, Serialize)]
struct ScoreRow {
    episode: usize,
    score: f32,
    steps: usize,
}

impl From<&EpisodeRecord> for ScoreRow {
    fn from(r: &EpisodeRecord) -> Self {
        Self {
            episode: r.episode,
            score: r.score,
            steps: r.steps,
        }
    }
}

/// Writes `episode,score,steps` rows, one per episode.
pub fn write_scores(path: impl AsRef<Path>, episodes: &[EpisodeRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_writer(File::create(path)?);
    for r in episodes.iter() {
        wtr.serialize(ScoreRow::from(r))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_write_scores() -> Result<()> {
        let dir = TempDir::new("scores")?;
        let path = dir.path().join("scores.csv");
        let episodes = vec![
            EpisodeRecord {
                episode: 0,
                score: -120.5,
                steps: 42,
            },
            EpisodeRecord {
                episode: 1,
                score: 3.25,
                steps: 200,
            },
        ];
        write_scores(&path, &episodes)?;

        let s = std::fs::read_to_string(&path)?;
        assert_eq!(s, "episode,score,steps\n0,-120.5,42\n1,3.25,200\n");
        Ok(())
    }
}
