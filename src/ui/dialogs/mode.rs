/// How a feature dialog treats the entity it shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    View,
    Edit,
}

impl DialogMode {
    pub fn fields_editable(&self) -> bool {
        match self {
            DialogMode::Create | DialogMode::Edit => true,
            DialogMode::View => false,
        }
    }

    pub fn shows_save(&self) -> bool {
        match self {
            DialogMode::Create | DialogMode::Edit => true,
            DialogMode::View => false,
        }
    }

    /// Only existing entities can be deleted
    pub fn shows_delete(&self) -> bool {
        match self {
            DialogMode::Create => false,
            DialogMode::View | DialogMode::Edit => true,
        }
    }

    pub fn save_label(&self) -> &'static str {
        match self {
            DialogMode::Create => "Create",
            DialogMode::View | DialogMode::Edit => "Save",
        }
    }

    pub fn title_for(&self, entity: &str) -> String {
        match self {
            DialogMode::Create => format!("New {}", entity),
            DialogMode::View => entity.to_string(),
            DialogMode::Edit => format!("Edit {}", entity),
        }
    }
}
