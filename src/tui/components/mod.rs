//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: mode, user and status line
//! - `Dialog`: modal alert or confirmation
//!
//! ### Stateful Components (Event-Driven)
//!
//! Each keeps a `...State` in `TuiState` and is rendered through a
//! transient wrapper that borrows it for one frame:
//! - `SearchForm`: home screen inputs
//! - `TripList`: trip selection
//! - `TripDetails`: one trip and its requests
//! - `Sidebar`: navigation menu
//!
//! Components receive external data as props, never by reaching into `App`.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs
//! ├── dialog.rs
//! ├── search_form.rs
//! ├── trip_list.rs
//! ├── trip_details.rs
//! └── sidebar.rs
//! ```

pub mod dialog;
pub mod search_form;
pub mod sidebar;
pub mod title_bar;
pub mod trip_details;
pub mod trip_list;

pub use dialog::Dialog;
pub use search_form::{SearchFormState, SearchFormView};
pub use sidebar::{Sidebar, SidebarState};
pub use title_bar::TitleBar;
pub use trip_details::{TripDetails, TripDetailsState};
pub use trip_list::{TripList, TripListState};
