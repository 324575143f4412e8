/**
 * HybridReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::fs::File;
use std::io::prelude::*;
use std::io::{stdout, BufReader, BufWriter};
use std::path::Path;

use crate::collaborative::{FactorModel, LatentFactors};
use crate::config::RatingScale;
use crate::dataset::{self, Interaction};
use crate::error::RecoError;
use crate::evaluation::Report;
use crate::types::{ItemId, MultiVector, ScoredItem, UserId};

/// Reads a CSV input file. We expect NO headers, and a user-item-rating triple per line with tab
/// separation.
pub fn tsv_reader<P: AsRef<Path>>(path: P) -> Result<csv::Reader<File>, RecoError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_path(path)?;

    Ok(reader)
}

/// Reads a training or held-out split.
pub fn read_interactions<P: AsRef<Path>>(path: P) -> Result<Vec<Interaction>, RecoError> {
    let mut reader = tsv_reader(path)?;

    let mut interactions = Vec::new();
    for record in reader.deserialize() {
        let (user, item, rating): (UserId, ItemId, f64) = record?;
        interactions.push(Interaction::new(user, item, rating));
    }

    Ok(interactions)
}

pub fn write_interactions<P, I>(path: P, interactions: I) -> Result<(), RecoError>
    where P: AsRef<Path>, I: IntoIterator<Item=Interaction> {

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_path(path)?;

    for interaction in interactions {
        writer.serialize((interaction.user, interaction.item, interaction.rating))?;
    }

    writer.flush()?;

    Ok(())
}

/// Reads a dense rating matrix: comma separated, no headers, one row per user. The first column
/// holds the number of ratings of the row and is ignored, the remaining columns are the items.
/// Ratings are normalised to `[0,1]`, missing values and unparsable cells are skipped.
pub fn read_rating_matrix<P: AsRef<Path>>(
    path: P,
    scale: &RatingScale,
) -> Result<Vec<Interaction>, RecoError> {

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut interactions = Vec::new();

    for (user, record) in reader.records().enumerate() {
        let record = record?;

        for (column, cell) in record.iter().enumerate().skip(1) {
            let normalized = cell.trim()
                .parse::<f64>()
                .ok()
                .and_then(|raw| dataset::normalize_rating(raw, scale));

            if let Some(rating) = normalized {
                interactions.push(Interaction::new(user as UserId, (column - 1) as ItemId, rating));
            }
        }
    }

    Ok(interactions)
}

/// A line of the embeddings file.
#[derive(Deserialize)]
struct ItemEmbedding {
    item: ItemId,
    tokens: MultiVector,
}

/// Reads multi-vector embeddings from JSON lines. Items must be numbered consecutively from
/// zero, the result is indexed by item id.
pub fn read_embeddings<P: AsRef<Path>>(path: P) -> Result<Vec<MultiVector>, RecoError> {
    let reader = BufReader::new(File::open(path)?);

    let mut embeddings: Vec<ItemEmbedding> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            embeddings.push(serde_json::from_str(&line)?);
        }
    }

    embeddings.sort_by_key(|embedding| embedding.item);

    for (index, embedding) in embeddings.iter().enumerate() {
        let expected = index as ItemId;
        if embedding.item < expected {
            return Err(RecoError::InvalidConfig(
                format!("duplicate embedding for item {}", embedding.item)));
        }
        if embedding.item > expected {
            return Err(RecoError::MissingEmbedding(expected));
        }
    }

    Ok(embeddings.into_iter().map(|embedding| embedding.tokens).collect())
}

pub fn read_factor_model<P: AsRef<Path>>(path: P) -> Result<FactorModel, RecoError> {
    let reader = BufReader::new(File::open(path)?);
    let latent_factors: LatentFactors = serde_json::from_reader(reader)?;

    FactorModel::new(latent_factors)
}

fn output(path: Option<String>) -> Result<Box<dyn Write>, RecoError> {
    let out: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(&Path::new(&path))?)),
        _ => Box::new(stdout()),
    };

    Ok(out)
}

/// Writes the report as a JSON document. If an `output_path` is supplied, we write to a file at
/// the specified path, otherwise, we output to stdout.
pub fn write_report(report: &Report, output_path: Option<String>) -> Result<(), RecoError> {
    let mut out = output(output_path)?;

    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Struct used for JSON serialization of computed recommendations. Field names will be used in
/// JSON.
#[derive(Serialize)]
struct Recommendations<'a> {
    for_user: UserId,
    recommended_items: &'a [ScoredItem],
}

/// Output recommendations in JSON lines format, one line per user.
pub fn write_recommendations(
    users: &[UserId],
    recommendations: &[Vec<ScoredItem>],
    output_path: Option<String>,
) -> Result<(), RecoError> {

    let mut out = output(output_path)?;

    for (user, recommended_items) in users.iter().zip(recommendations.iter()) {
        let line = serde_json::to_string(&Recommendations {
            for_user: *user,
            recommended_items,
        })?;

        writeln!(out, "{}", line)?;
    }

    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {

    use std::fs;

    use super::*;
    use crate::collaborative::CollaborativeScorer;

    #[test]
    fn interactions_survive_a_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.tsv");

        let interactions = vec![Interaction::new(1, 2, 0.25), Interaction::new(3, 4, 1.0)];
        write_interactions(&path, interactions.clone()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1\t2\t0.25\n3\t4\t1.0\n");
        assert_eq!(read_interactions(&path).unwrap(), interactions);
    }

    #[test]
    fn rating_matrix_drops_count_column_and_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.csv");

        fs::write(&path, "2,10,99,-10\n1,99,0,\n").unwrap();

        let interactions = read_rating_matrix(&path, &RatingScale::default()).unwrap();

        assert_eq!(interactions, vec![
            Interaction::new(0, 0, 1.0),
            Interaction::new(0, 2, 0.0),
            Interaction::new(1, 1, 0.5),
        ]);
    }

    #[test]
    fn embeddings_are_ordered_by_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.jsonl");

        fs::write(&path, concat!(
            "{\"item\": 1, \"tokens\": [[0.0, 1.0]]}\n",
            "\n",
            "{\"item\": 0, \"tokens\": [[1.0, 0.0], [0.5, 0.5]]}\n",
        )).unwrap();

        let embeddings = read_embeddings(&path).unwrap();

        assert_eq!(embeddings, vec![
            vec![vec![1.0, 0.0], vec![0.5, 0.5]],
            vec![vec![0.0, 1.0]],
        ]);
    }

    #[test]
    fn gaps_in_embeddings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("embeddings.jsonl");

        fs::write(&path, "{\"item\": 0, \"tokens\": [[1.0]]}\n{\"item\": 2, \"tokens\": [[1.0]]}\n")
            .unwrap();

        match read_embeddings(&path) {
            Err(RecoError::MissingEmbedding(1)) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn factor_model_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("factors.json");

        fs::write(&path, r#"{
            "global_mean": 0.5,
            "users": [{"id": 3, "bias": 0.1, "factors": [1.0]}],
            "items": [{"id": 8, "factors": [0.2]}, {"id": 9, "bias": -0.1, "factors": [0.0]}]
        }"#).unwrap();

        let model = read_factor_model(&path).unwrap();

        assert_eq!(model.catalog(), &[8, 9]);
        assert!((model.predict_one(3, 8).unwrap() - 0.8).abs() < 0.000001);
    }

    #[test]
    fn report_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");

        let report = Report {
            mae: 0.5,
            precision: 0.25,
            recall: 0.0,
            map: 0.0,
            ndcg: 0.0,
            diversity: 1.0,
            novelty: 0.0,
            serendipity: 0.0,
            failed_users: 2,
        };

        write_report(&report, Some(path.to_string_lossy().to_string())).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(written["precision@k"].as_f64(), Some(0.25));
        assert_eq!(written["diversity@k"].as_f64(), Some(1.0));
        assert_eq!(written["failed_users"].as_u64(), Some(2));
    }

    #[test]
    fn recommendations_written_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recommendations.jsonl");

        let users = vec![1, 2];
        let recommendations = vec![vec![ScoredItem::new(4, 0.5)], vec![]];

        write_recommendations(&users, &recommendations, Some(path.to_string_lossy().to_string()))
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(lines, vec![
            r#"{"for_user":1,"recommended_items":[{"item":4,"score":0.5}]}"#,
            r#"{"for_user":2,"recommended_items":[]}"#,
        ]);
    }
}
