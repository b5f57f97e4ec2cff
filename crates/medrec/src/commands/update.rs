use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MedrecError, Result};
use crate::index::{resolve, RecordSelector};
use crate::model::{MedicalRecord, RecordField};
use crate::store::RecordRepository;
use crate::table::edit::{CellEditor, EditOutcome};

/// Edits one cell the way the table does: stage the new text in a
/// [`CellEditor`] and commit it, saving only when the value changed.
pub fn run<R: RecordRepository>(
    store: &mut R,
    selector: &RecordSelector,
    field: RecordField,
    value: &str,
    actor: &str,
) -> Result<CmdResult> {
    if !field.is_editable() {
        return Err(MedrecError::FieldNotEditable(field));
    }
    let pos = resolve(store.records(), selector)?;
    let current = &store.records()[pos];
    let mut editor = CellEditor::new(current.id.clone(), field, current.field_value(field));

    editor.begin_edit();
    editor.set_buffer(value);
    let (outcome, saved) = editor.commit(|id, field, value| {
        store
            .update(id, field, value, actor)
            .map(MedicalRecord::clone)
    });

    let mut result = CmdResult::default();
    match (outcome, saved) {
        (EditOutcome::Saved, Some(Ok(record))) => {
            result.add_message(CmdMessage::success("Record updated successfully"));
            result.affected_records.push(record);
        }
        (EditOutcome::Saved, Some(Err(e))) => return Err(e),
        _ => result.add_message(CmdMessage::info(format!("{} is unchanged", field))),
    }
    Ok(result)
}
