use super::document::DocumentId;

/// All messages that can be sent through the FLTK channel.
/// Each menu, toolbar and tab callback sends one of these; the loop in main
/// hands them to `dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    FileQuit,

    // Edit
    EditUndo,
    EditRedo,
    EditCut,
    EditCopy,
    EditPaste,
    SelectAll,

    // View
    ZoomIn,
    ZoomOut,

    // Tools
    LlmQuery,
    GenerateInvoice,
    SendToTelegram,

    // Settings & Help
    ConfigureLlm,
    ConfigureTelegram,
    ShowAbout,

    // Tabs
    TabSwitch(DocumentId),
    TabClose(DocumentId),

    /// The editor buffer changed; titles and tab labels need a refresh.
    BufferModified,
}
