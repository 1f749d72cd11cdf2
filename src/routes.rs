//! Named routes and the navigation stack.

use std::fmt;

/// A screen in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    /// The list of recorded exercises.
    Progress,
    AddExercise,
    EditExercise { exercise_id: String },
}

impl Route {
    pub const HOME: &'static str = "home";
    pub const PROGRESS: &'static str = "progress";
    pub const ADD_EXERCISE: &'static str = "addExercise";
    pub const EDIT_EXERCISE: &'static str = "editExercise";

    pub fn edit(exercise_id: impl Into<String>) -> Self {
        Route::EditExercise {
            exercise_id: exercise_id.into(),
        }
    }

    /// Route path, e.g. `editExercise/abc123`.
    pub fn path(&self) -> String {
        match self {
            Route::Home => Self::HOME.to_string(),
            Route::Progress => Self::PROGRESS.to_string(),
            Route::AddExercise => Self::ADD_EXERCISE.to_string(),
            Route::EditExercise { exercise_id } => {
                format!("{}/{}", Self::EDIT_EXERCISE, exercise_id)
            }
        }
    }

    /// Parse a route path. The edit route needs a non-empty `exerciseId`.
    pub fn parse(path: &str) -> Option<Self> {
        match path.split_once('/') {
            None => match path {
                Self::HOME => Some(Route::Home),
                Self::PROGRESS => Some(Route::Progress),
                Self::ADD_EXERCISE => Some(Route::AddExercise),
                _ => None,
            },
            Some((Self::EDIT_EXERCISE, id)) if !id.is_empty() && !id.contains('/') => {
                Some(Route::edit(id))
            }
            Some(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A stack of routes, rooted at `Home`.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Home],
        }
    }

    pub fn current(&self) -> &Route {
        // The root is never popped.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn navigate(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pop the current route. Returns None at the root.
    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }
}
