// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text classification for ticket auto-routing.
//!
//! [`ClassifierClient`] talks to the external classification service over
//! HTTP. [`TrainingSource`] implementations gather labelled examples, and
//! [`RetrainScheduler`] keeps the model current in the background.

pub mod client;
pub mod retrain;
pub mod training;
pub mod types;

pub use client::ClassifierClient;
pub use retrain::{
    RetrainHandle, RetrainRequest, RetrainScheduler, TrainingEvent, retrain_once,
};
pub use training::{HelpTopicExamples, TrainingSet, TrainingSource};
