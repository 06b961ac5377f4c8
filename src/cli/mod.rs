// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the glint command-line interface.
//!
//! Three subcommands over a JSON document tree: `extract` shows what would be
//! sent to the oracle, `leaves` lists the searchable text leaves, and `find`
//! runs one search session end to end. There is no real oracle here; `find`
//! takes its snippets from `--snippets` (inline JSON or a file) so semantic
//! resolution can be exercised offline.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "glint",
    about = "Find-in-page over document trees: literal search, snippet resolution, highlights",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the main-content corpus the oracle would receive
    Extract {
        /// Path to a JSON document tree
        doc: PathBuf,

        /// Path to a JSON search config (defaults apply for missing keys)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the visible text leaves of a document
    Leaves {
        /// Path to a JSON document tree
        doc: PathBuf,
    },

    /// Run one search session and show the highlights
    Find {
        /// Path to a JSON document tree
        doc: PathBuf,

        /// Query; a leading `'` forces literal search, a leading `/` forces semantic
        query: String,

        /// Oracle reply: a JSON array of snippets, `null`, or `{"error": ...}`
        ///
        /// Either inline JSON or a path to a file holding it. Without this the
        /// oracle answers "no match".
        #[arg(short, long)]
        snippets: Option<String>,

        /// Make the oracle fail with a transport error
        #[arg(long, conflicts_with = "snippets")]
        fail_oracle: bool,

        /// Advance the cursor this many times after highlighting
        #[arg(short, long, default_value = "0")]
        next: usize,

        /// Print a JSON report instead of the boxed view
        #[arg(long)]
        json: bool,

        /// Path to a JSON search config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
