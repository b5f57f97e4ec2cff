use crate::commands::{CmdMessage, CmdResult, UNDO_KEY};
use crate::error::{MedrecError, Result};
use crate::index::{resolve, RecordSelector};
use crate::store::RecordRepository;

/// Removes the record and parks it in the undo buffer, replacing whatever
/// was there.
pub fn run<R: RecordRepository>(store: &mut R, selector: &RecordSelector) -> Result<CmdResult> {
    let pos = resolve(store.records(), selector)?;
    let id = store.records()[pos].id.clone();
    let removed = store.delete(&id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Record deleted successfully"));
    let buffered = serde_json::to_string(&removed)
        .map_err(MedrecError::from)
        .and_then(|raw| store.storage().set(UNDO_KEY, &raw));
    match buffered {
        Ok(()) => result.add_message(CmdMessage::info("Deletion can be undone")),
        Err(e) => {
            log::warn!("could not save undo buffer: {}", e);
            result.add_message(CmdMessage::warning("This deletion cannot be undone"));
        }
    }
    result.affected_records.push(removed);
    Ok(result)
}
