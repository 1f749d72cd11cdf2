//! Form state for adding and editing an exercise.
//!
//! The form holds raw text exactly as typed; coercion to integers happens
//! in the store on submit.

use crate::document::DocumentStore;
use crate::exercise::{ExerciseError, ExerciseRecord, ExerciseStore};
use crate::pending::Pending;

/// What the screen should do once a submit or delete has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Success: leave the form.
    NavigateBack,
    /// Failure: stay on the form and show the message.
    Notify(String),
}

impl FormOutcome {
    pub fn from_result<T>(result: &Result<T, ExerciseError>) -> Self {
        match result {
            Ok(_) => FormOutcome::NavigateBack,
            Err(err) => FormOutcome::Notify(err.to_string()),
        }
    }
}

/// Editable name plus one text field per set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseForm {
    exercise_id: Option<String>,
    name: String,
    weights: Vec<String>,
}

impl Default for ExerciseForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseForm {
    /// An empty add form with a single set field.
    pub fn new() -> Self {
        Self {
            exercise_id: None,
            name: String::new(),
            weights: vec![String::new()],
        }
    }

    /// An edit form seeded from a stored record, sets in order.
    pub fn edit(record: &ExerciseRecord) -> Self {
        Self {
            exercise_id: Some(record.id.clone()),
            name: record.name.clone(),
            weights: record.weights.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn exercise_id(&self) -> Option<&str> {
        self.exercise_id.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.exercise_id.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn weights(&self) -> &[String] {
        &self.weights
    }

    /// Append an empty set field.
    pub fn add_set(&mut self) {
        self.weights.push(String::new());
    }

    /// Remove the set at `index`. Returns false if there is none.
    pub fn remove_set(&mut self, index: usize) -> bool {
        if index < self.weights.len() {
            self.weights.remove(index);
            true
        } else {
            false
        }
    }

    /// Replace the text of the set at `index`. Returns false if there is none.
    pub fn set_weight(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.weights.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Create or update, depending on how the form was opened.
    /// Resolves to the record id.
    pub fn submit<S: DocumentStore + 'static>(&self, store: &ExerciseStore<S>) -> Pending<String> {
        match &self.exercise_id {
            None => store.create(&self.name, self.weights.as_slice()),
            Some(id) => {
                let id = id.clone();
                store
                    .update(&id, &self.name, self.weights.as_slice())
                    .map(move |()| id)
            }
        }
    }

    /// Delete the record being edited. An add form has nothing to delete.
    pub fn delete<S: DocumentStore + 'static>(&self, store: &ExerciseStore<S>) -> Pending<()> {
        match &self.exercise_id {
            Some(id) => store.delete(id),
            None => Pending::ready(Err(ExerciseError::MissingId)),
        }
    }
}
