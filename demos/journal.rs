//! Walk through the journal screens against the in-memory store.
//!
//! Run with `RUST_LOG=fitness_journal=debug cargo run --example journal`.

use std::sync::mpsc::channel;
use std::sync::Mutex;
use std::time::Duration;

use fitness_journal::{
    ExerciseForm, ExerciseRecord, ExerciseStore, FormOutcome, InMemoryDocumentStore,
    JournalConfig, Navigator, Route,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = JournalConfig::from_env()?;
    let store = ExerciseStore::with_config(InMemoryDocumentStore::new(), config);
    let mut nav = Navigator::new();

    let (tx, rx) = channel();
    let tx = Mutex::new(tx);
    let subscription = store.subscribe(
        move |records: &[ExerciseRecord]| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(records.to_vec());
            }
        },
        |err| eprintln!("listen failed: {}", err),
    )?;
    let wait = Duration::from_secs(1);
    print_list(&rx.recv_timeout(wait)?);

    nav.navigate(Route::AddExercise);
    let mut form = ExerciseForm::new();
    form.set_name("Bench Press");
    form.set_weight(0, "60");
    form.add_set();
    form.set_weight(1, "65");
    form.add_set();
    form.set_weight(2, "seventy");
    let created = form.submit(&store).wait();
    if let FormOutcome::Notify(message) = FormOutcome::from_result(&created) {
        eprintln!("{}", message);
    }
    let id = created?;
    nav.back();
    print_list(&rx.recv_timeout(wait)?);

    nav.navigate(Route::edit(id.clone()));
    let mut edit = ExerciseForm::edit(&store.fetch_one(&id).wait()?);
    edit.set_weight(2, "70");
    edit.submit(&store).wait()?;
    nav.back();
    print_list(&rx.recv_timeout(wait)?);

    nav.navigate(Route::edit(id.clone()));
    edit.delete(&store).wait()?;
    nav.back();
    print_list(&rx.recv_timeout(wait)?);

    subscription.unsubscribe();
    println!("back at {}", nav.current());
    Ok(())
}

fn print_list(records: &[ExerciseRecord]) {
    if records.is_empty() {
        println!("(no exercises)");
    }
    for record in records {
        println!("{}", record);
    }
}
