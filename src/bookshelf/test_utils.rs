use crate::form::{FormField, FormValues, InvalidField};
use crate::view::{FormMode, Notice, Surface, TableView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    ReplaceTable(usize),
    ShowModal(FormMode),
    HideModal,
    FlagField(FormField),
    Notify(Notice),
}

/// A [`Surface`] that draws nothing and remembers everything it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub tables: Vec<TableView>,
    pub modal_values: Option<FormValues>,
}

impl RecordingSurface {
    pub fn last_table(&self) -> Option<&TableView> {
        self.tables.last()
    }

    pub fn last_titles(&self) -> Vec<String> {
        self.last_table()
            .map(|t| t.rows.iter().map(|r| r.title.clone()).collect())
            .unwrap_or_default()
    }

    pub fn notices(&self) -> Vec<&Notice> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Notify(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn replace_table(&mut self, table: &TableView) {
        self.calls.push(SurfaceCall::ReplaceTable(table.rows.len()));
        self.tables.push(table.clone());
    }

    fn show_modal(&mut self, mode: FormMode, values: &FormValues) {
        self.calls.push(SurfaceCall::ShowModal(mode));
        self.modal_values = Some(values.clone());
    }

    fn hide_modal(&mut self) {
        self.calls.push(SurfaceCall::HideModal);
        self.modal_values = None;
    }

    fn flag_field(&mut self, invalid: &InvalidField) {
        self.calls.push(SurfaceCall::FlagField(invalid.field));
    }

    fn notify(&mut self, notice: &Notice) {
        self.calls.push(SurfaceCall::Notify(notice.clone()));
    }
}
