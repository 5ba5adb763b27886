use crate::panel::Panel;

/// The UI collaborators the controller drives: an input field, a send
/// control, a model selector and the panel messages are mounted into.
///
/// The terminal view implements this for real use; tests provide their own.
pub trait ChatSurface {
    /// Current contents of the input field, untrimmed
    fn input_text(&self) -> &str;

    fn clear_input(&mut self);

    /// Identifier currently chosen in the model selector
    fn selected_model(&self) -> &str;

    fn set_send_enabled(&mut self, enabled: bool);

    fn send_enabled(&self) -> bool;

    /// Return keyboard focus to the input field
    fn focus_input(&mut self);

    fn panel_mut(&mut self) -> &mut Panel;
}
