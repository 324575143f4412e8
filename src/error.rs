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

use std::io;

use crate::types::{ItemId, UserId};

#[derive(thiserror::Error, Debug)]
pub enum RecoError {
    #[error("cannot build a similarity matrix from an empty embedding collection")]
    EmptyEmbeddings,

    #[error("item {item} has no token vectors")]
    EmptyItem { item: usize },

    #[error("token of item {item} has dimension {found}, expected {expected}")]
    DimensionMismatch { item: usize, expected: usize, found: usize },

    #[error("item {item} is out of range for {num_items} items")]
    ItemOutOfRange { item: ItemId, num_items: usize },

    /// The user was never seen when the model was fitted.
    #[error("unknown user {0}")]
    UnknownUser(UserId),

    /// The item was never seen when the model was fitted.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("no embedding for item {0}")]
    MissingEmbedding(ItemId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
