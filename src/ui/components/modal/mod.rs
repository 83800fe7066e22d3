//! Generic modal dialog framework.
//!
//! A modal is a controlled component: the owner keeps the open flag and
//! passes it in every frame as [`ModalProps`] together with a freshly built
//! [`ModalConfig`]. [`ModalState`] holds what the shell itself owns: the
//! active tab, the mounted content, and the hit areas of the last render.

mod config;
mod content;
mod footer;
mod shell;
mod tabs;

pub use config::{
    ContentFactory, Handler, ModalConfig, ModalError, ModalProps, ModalSize, OpenChangeHandler,
    TabDescriptor, TabSet,
};
pub use content::{ContentKeyResult, ModalContent, StaticContent};
pub use footer::{ActionFooter, FooterButton, FooterButtonView, FooterPress};
pub use shell::{Modal, ModalOutcome, ModalState};
pub use tabs::TabController;
