//! Exercise catalog loading, validation and queries.
//!
//! Catalogs arrive as JSON arrays of exercise templates. They are decoded into
//! strongly typed templates and validated once at startup, so the scorer never
//! sees untyped data. A small built-in catalog is provided for hosts without one.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

/// Equipment tag every user is assumed to have
pub const BODYWEIGHT: &str = "Bodyweight";

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

struct Entry {
    id: &'static str,
    name: &'static str,
    primary: &'static [&'static str],
    secondary: &'static [&'static str],
    equipment: &'static [&'static str],
    reps: (u32, u32),
    difficulty: Difficulty,
    pattern: Option<&'static str>,
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl From<&Entry> for ExerciseTemplate {
    fn from(e: &Entry) -> Self {
        ExerciseTemplate {
            id: e.id.into(),
            name: e.name.into(),
            primary_muscles: strings(e.primary),
            secondary_muscles: strings(e.secondary),
            equipment: strings(e.equipment),
            default_rep_min: Some(e.reps.0),
            default_rep_max: Some(e.reps.1),
            difficulty: Some(e.difficulty),
            movement_pattern: e.pattern.map(String::from),
        }
    }
}

const BUILT_IN: &[Entry] = &[
    Entry {
        id: "barbell_bench_press",
        name: "Barbell Bench Press",
        primary: &["Chest"],
        secondary: &["Triceps", "Shoulders"],
        equipment: &["Barbell", "Bench"],
        reps: (5, 10),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Push"),
    },
    Entry {
        id: "dumbbell_bench_press",
        name: "Dumbbell Bench Press",
        primary: &["Chest"],
        secondary: &["Triceps", "Shoulders"],
        equipment: &["Dumbbells", "Bench"],
        reps: (8, 12),
        difficulty: Difficulty::Beginner,
        pattern: Some("Push"),
    },
    Entry {
        id: "push_up",
        name: "Push-up",
        primary: &["Chest"],
        secondary: &["Triceps", "Shoulders", "Core"],
        equipment: &["Bodyweight"],
        reps: (8, 20),
        difficulty: Difficulty::Beginner,
        pattern: Some("Push"),
    },
    Entry {
        id: "dumbbell_fly",
        name: "Dumbbell Fly",
        primary: &["Chest"],
        secondary: &["Shoulders"],
        equipment: &["Dumbbells", "Bench"],
        reps: (10, 15),
        difficulty: Difficulty::Intermediate,
        pattern: None,
    },
    Entry {
        id: "overhead_press",
        name: "Overhead Press",
        primary: &["Shoulders"],
        secondary: &["Triceps", "Core"],
        equipment: &["Barbell"],
        reps: (5, 8),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Push"),
    },
    Entry {
        id: "dumbbell_shoulder_press",
        name: "Dumbbell Shoulder Press",
        primary: &["Shoulders"],
        secondary: &["Triceps"],
        equipment: &["Dumbbells"],
        reps: (8, 12),
        difficulty: Difficulty::Beginner,
        pattern: Some("Push"),
    },
    Entry {
        id: "pull_up",
        name: "Pull-up",
        primary: &["Back"],
        secondary: &["Biceps", "Forearms"],
        equipment: &["Pull-up Bar"],
        reps: (5, 10),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Pull"),
    },
    Entry {
        id: "dumbbell_row",
        name: "Dumbbell Row",
        primary: &["Back"],
        secondary: &["Biceps"],
        equipment: &["Dumbbells", "Bench"],
        reps: (8, 12),
        difficulty: Difficulty::Beginner,
        pattern: Some("Pull"),
    },
    Entry {
        id: "barbell_row",
        name: "Barbell Row",
        primary: &["Back"],
        secondary: &["Biceps", "Hamstrings"],
        equipment: &["Barbell"],
        reps: (6, 10),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Pull"),
    },
    Entry {
        id: "back_squat",
        name: "Back Squat",
        primary: &["Quads", "Glutes"],
        secondary: &["Hamstrings", "Core"],
        equipment: &["Barbell", "Squat Rack"],
        reps: (5, 8),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Squat"),
    },
    Entry {
        id: "goblet_squat",
        name: "Goblet Squat",
        primary: &["Quads", "Glutes"],
        secondary: &["Core"],
        equipment: &["Dumbbells", "Kettlebell"],
        reps: (8, 15),
        difficulty: Difficulty::Beginner,
        pattern: Some("Squat"),
    },
    Entry {
        id: "romanian_deadlift",
        name: "Romanian Deadlift",
        primary: &["Hamstrings", "Glutes"],
        secondary: &["Back"],
        equipment: &["Barbell", "Dumbbells"],
        reps: (6, 10),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Hinge"),
    },
    Entry {
        id: "kettlebell_swing",
        name: "Kettlebell Swing",
        primary: &["Glutes", "Hamstrings"],
        secondary: &["Core", "Back"],
        equipment: &["Kettlebell"],
        reps: (10, 20),
        difficulty: Difficulty::Intermediate,
        pattern: Some("Hinge"),
    },
    Entry {
        id: "walking_lunge",
        name: "Walking Lunge",
        primary: &["Quads", "Glutes"],
        secondary: &["Hamstrings"],
        equipment: &["Bodyweight", "Dumbbells"],
        reps: (10, 16),
        difficulty: Difficulty::Beginner,
        pattern: Some("Lunge"),
    },
    Entry {
        id: "dumbbell_curl",
        name: "Dumbbell Curl",
        primary: &["Biceps"],
        secondary: &["Forearms"],
        equipment: &["Dumbbells"],
        reps: (8, 15),
        difficulty: Difficulty::Beginner,
        pattern: None,
    },
    Entry {
        id: "bench_dip",
        name: "Bench Dip",
        primary: &["Triceps"],
        secondary: &["Chest", "Shoulders"],
        equipment: &["Bench"],
        reps: (8, 15),
        difficulty: Difficulty::Beginner,
        pattern: Some("Push"),
    },
    Entry {
        id: "farmers_carry",
        name: "Farmer's Carry",
        primary: &["Forearms"],
        secondary: &["Core", "Back"],
        equipment: &["Dumbbells", "Kettlebell"],
        reps: (1, 1),
        difficulty: Difficulty::Beginner,
        pattern: Some("Carry"),
    },
    Entry {
        id: "plank",
        name: "Plank",
        primary: &["Core"],
        secondary: &["Shoulders"],
        equipment: &["Bodyweight"],
        reps: (1, 1),
        difficulty: Difficulty::Beginner,
        pattern: Some("Anti-rotation"),
    },
    Entry {
        id: "standing_calf_raise",
        name: "Standing Calf Raise",
        primary: &["Calves"],
        secondary: &[],
        equipment: &["Bodyweight", "Dumbbells"],
        reps: (12, 20),
        difficulty: Difficulty::Beginner,
        pattern: None,
    },
];

/// Builds the built-in sample catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> Catalog {
    Catalog {
        exercises: BUILT_IN.iter().map(ExerciseTemplate::from).collect(),
    }
}

/// Whether the user's equipment covers at least one of the template's tags
pub fn equipment_available(template: &ExerciseTemplate, equipment: &[String]) -> bool {
    template
        .equipment
        .iter()
        .any(|eq| eq == BODYWEIGHT || equipment.contains(eq))
}

impl Catalog {
    pub fn new(exercises: Vec<ExerciseTemplate>) -> Self {
        Self { exercises }
    }

    /// Decode and validate a JSON array of exercise templates
    pub fn from_json_str(json: &str) -> Result<Self> {
        let exercises: Vec<ExerciseTemplate> = serde_json::from_str(json)
            .map_err(|e| Error::CatalogValidation(format!("Malformed catalog: {}", e)))?;

        let catalog = Catalog { exercises };
        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }

        tracing::debug!("Decoded catalog with {} exercises", catalog.len());
        Ok(catalog)
    }

    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!("Loaded {} exercises from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseTemplate> {
        self.exercises.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseTemplate> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ExerciseTemplate> {
        self.exercises.iter().find(|e| e.name == name)
    }

    /// Exercises hitting a muscle group as primary or secondary mover
    pub fn by_muscle(&self, muscle: &str) -> Vec<&ExerciseTemplate> {
        self.exercises
            .iter()
            .filter(|e| {
                e.primary_muscles.iter().any(|m| m == muscle)
                    || e.secondary_muscles.iter().any(|m| m == muscle)
            })
            .collect()
    }

    /// Exercises doable with the given equipment
    pub fn by_equipment(&self, equipment: &[String]) -> Vec<&ExerciseTemplate> {
        self.exercises
            .iter()
            .filter(|e| equipment_available(e, equipment))
            .collect()
    }

    /// Case-insensitive name search
    pub fn search(&self, query: &str) -> Vec<&ExerciseTemplate> {
        let query = query.to_lowercase();
        self.exercises
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for (idx, exercise) in self.exercises.iter().enumerate() {
            if exercise.id.is_empty() {
                errors.push(format!("Exercise at index {} has empty ID", idx));
            } else if !ids.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }

            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            } else if !names.insert(exercise.name.as_str()) {
                errors.push(format!("Duplicate exercise name '{}'", exercise.name));
            }

            if exercise.equipment.is_empty() {
                errors.push(format!("Exercise '{}' lists no equipment", exercise.id));
            }

            if let (Some(min), Some(max)) = (exercise.default_rep_min, exercise.default_rep_max) {
                if min > max {
                    errors.push(format!(
                        "Exercise '{}': default rep min {} > max {}",
                        exercise.id, min, max
                    ));
                }
            }
        }

        errors
    }
}
