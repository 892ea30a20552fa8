// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! External capabilities consumed at ingest time.
//!
//! The station only needs `classify(image) -> label` and
//! `annotate(image, label)`. Labels are opaque display strings.

use crate::error::CapabilityError;
use rand::seq::SliceRandom;
use std::path::Path;

pub trait Classifier: Send + Sync {
    fn classify(&self, image: &Path) -> Result<String, CapabilityError>;
}

pub trait Annotator: Send + Sync {
    fn annotate(&self, image: &Path, label: &str) -> Result<(), CapabilityError>;
}

pub const BIRD_SPECIES: [&str; 10] = [
    "Eurasian Blue Tit",
    "Great Spotted Woodpecker",
    "European Robin",
    "Blackbird",
    "House Sparrow",
    "Goldfinch",
    "Chaffinch",
    "Greenfinch",
    "Magpie",
    "Wood Pigeon",
];

/// Placeholder model: a uniform pick from `BIRD_SPECIES`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSpeciesClassifier;

impl Classifier for RandomSpeciesClassifier {
    fn classify(&self, _image: &Path) -> Result<String, CapabilityError> {
        BIRD_SPECIES
            .choose(&mut rand::thread_rng())
            .map(|s| s.to_string())
            .ok_or_else(|| CapabilityError::new("classifier", "empty species list"))
    }
}

/// Always returns the same label.
#[derive(Clone, Debug)]
pub struct FixedClassifier(pub String);

impl Classifier for FixedClassifier {
    fn classify(&self, _image: &Path) -> Result<String, CapabilityError> {
        Ok(self.0.clone())
    }
}

/// Leaves the image untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnnotator;

impl Annotator for NoopAnnotator {
    fn annotate(&self, _image: &Path, _label: &str) -> Result<(), CapabilityError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_classifier_picks_known_species() {
        let classifier = RandomSpeciesClassifier;
        for _ in 0..20 {
            let label = classifier.classify(Path::new("x.jpg")).unwrap();
            assert!(BIRD_SPECIES.contains(&label.as_str()));
        }
    }
}
