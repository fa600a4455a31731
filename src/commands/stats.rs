use super::Session;
use crate::{
    libs::{messages::Message, stores::ExerciseStore, view::View},
    msg_info, msg_print,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let session = Session::open()?;
    let result = show(&session);
    session.finish();
    result
}

fn show(session: &Session) -> Result<()> {
    let mut store = ExerciseStore::new(&session.db.conn, None);
    let stats = store.load_stats()?;

    if stats.total_exercises == 0 {
        msg_info!(Message::NoExercisesFound);
        return Ok(());
    }

    msg_print!(Message::StatsHeader, true);
    View::stats(&stats)
}
