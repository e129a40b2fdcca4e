pub mod editor;
pub mod hit;
pub mod input;
pub mod media;
pub mod menu;
pub mod shortcuts;
pub mod sync;
pub mod text;
pub mod tools;

pub use editor::{EventOutcome, PageEditor};
pub use input::{CanvasFrame, FocusTarget, InputEvent, Modifiers, PointerButton};
pub use media::MediaFile;
pub use menu::{ContextMenu, MenuAction, MenuControls, MenuOutcome};
pub use sync::{EditorMutation, ImportOutcome, SyncEngine, SyncKey};
pub use text::{TextRegistry, TextSurface};
