use crate::core::annotations::AnnotationStore;
use crate::domain::model::{ColumnSet, ProjectedRow};
use crate::utils::error::{ChecklistError, Result};

pub const DONE_HEADER: &str = "Done";
pub const NOTES_HEADER: &str = "Notes";

/// 依目前的檢視結果輸出 CSV：Done, <欄位...>, Notes
pub fn export_projection(
    columns: &ColumnSet,
    projection: &[ProjectedRow<'_>],
    annotations: &AnnotationStore,
) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(columns.len() + 2);
    header.push(DONE_HEADER);
    header.extend(columns.iter());
    header.push(NOTES_HEADER);
    writer.write_record(&header)?;

    for entry in projection {
        let done = if annotations.is_done(entry.index) {
            "true"
        } else {
            "false"
        };

        let mut record = Vec::with_capacity(columns.len() + 2);
        record.push(done);
        record.extend(columns.iter().map(|column| entry.row.get(column).unwrap_or("")));
        record.push(annotations.note(entry.index));
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ChecklistError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ChecklistState;
    use crate::core::view::ViewPipeline;
    use crate::domain::model::{Row, RowIndex};

    #[test]
    fn test_export_includes_annotations() {
        let mut state = ChecklistState::new();
        state.rows.import_columns(["Title", "Difficulty"]);
        state.append_rows(vec![
            Row::new().with("Title", "LRU Cache").with("Difficulty", "Medium"),
            Row::new().with("Title", "Two Sum"),
        ]);
        state.annotations.toggle_done(RowIndex::new(0));
        state.annotations.set_note(RowIndex::new(0), "doubly linked, list");

        let projection =
            ViewPipeline::default().project(&state.rows, &state.annotations, &state.view);
        let bytes =
            export_projection(state.rows.columns(), &projection, &state.annotations).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Done,Title,Difficulty,Notes\n\
             true,LRU Cache,Medium,\"doubly linked, list\"\n\
             false,Two Sum,,\n"
        );
    }
}
