//! Screen flows: forms driving the store, outcomes driving navigation.

use fitness_journal::{
    ExerciseError, ExerciseForm, ExerciseStore, FormOutcome, InMemoryDocumentStore, Navigator,
    Route, StoreOperation,
};

fn new_store() -> ExerciseStore<InMemoryDocumentStore> {
    ExerciseStore::new(InMemoryDocumentStore::new())
}

#[test]
fn add_flow_navigates_back_on_success() {
    let store = new_store();
    let mut nav = Navigator::new();
    nav.navigate(Route::Progress);
    nav.navigate(Route::AddExercise);

    let mut form = ExerciseForm::new();
    form.set_name("Deadlift");
    form.set_weight(0, "140");
    form.add_set();
    form.set_weight(1, "150");

    let result = form.submit(&store).wait();
    if FormOutcome::from_result(&result) == FormOutcome::NavigateBack {
        nav.back();
    }

    assert_eq!(nav.current(), &Route::Progress);
    let id = result.unwrap();
    let stored = store.fetch_one(&id).wait().unwrap();
    assert_eq!(stored.weights, vec![140, 150]);
}

#[test]
fn failed_submit_keeps_the_form_open() {
    let store = new_store();
    store.client().fail_next(StoreOperation::Add, "UNAVAILABLE: offline");
    let mut nav = Navigator::new();
    nav.navigate(Route::AddExercise);

    let mut form = ExerciseForm::new();
    form.set_name("Squat");
    let outcome = FormOutcome::from_result(&form.submit(&store).wait());

    assert_eq!(outcome, FormOutcome::Notify("UNAVAILABLE: offline".into()));
    assert_eq!(nav.current(), &Route::AddExercise);
    assert_eq!(form.name(), "Squat");
}

#[test]
fn edit_route_seeds_the_form() {
    let store = new_store();
    let id = store.create("Row", &["50", "55"]).wait().unwrap();

    let route = Route::parse(&Route::edit(id.clone()).path()).unwrap();
    let exercise_id = match route {
        Route::EditExercise { exercise_id } => exercise_id,
        other => panic!("unexpected route {:?}", other),
    };

    let form = ExerciseForm::edit(&store.fetch_one(&exercise_id).wait().unwrap());
    assert!(form.is_edit());
    assert_eq!(form.exercise_id(), Some(id.as_str()));
    assert_eq!(form.weights(), &["50", "55"]);
}

#[test]
fn edit_form_of_deleted_record_reports_not_found() {
    let store = new_store();
    let id = store.create("Row", &["50"]).wait().unwrap();
    let form = ExerciseForm::edit(&store.fetch_one(&id).wait().unwrap());

    store.delete(&id).wait().unwrap();

    let result = form.submit(&store).wait();
    assert_eq!(result, Err(ExerciseError::NotFound { id: id.clone() }));
    assert_eq!(
        FormOutcome::from_result(&result),
        FormOutcome::Notify(format!("exercise not found: {}", id))
    );
}

#[test]
fn delete_from_edit_form() {
    let store = new_store();
    let id = store.create("Curl", &["10"]).wait().unwrap();
    let form = ExerciseForm::edit(&store.fetch_one(&id).wait().unwrap());

    assert_eq!(
        FormOutcome::from_result(&form.delete(&store).wait()),
        FormOutcome::NavigateBack
    );
    assert!(store.fetch_one(&id).wait().unwrap_err().is_not_found());
}

#[test]
fn add_form_has_nothing_to_delete() {
    let store = new_store();
    assert_eq!(
        ExerciseForm::new().delete(&store).wait(),
        Err(ExerciseError::MissingId)
    );
}
