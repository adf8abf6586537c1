// Declarative list/detail state machine shared by all three entity
// kinds. The presentation layer renders whatever `state()` says and
// feeds operator intents back in; nothing here touches a rendering
// surface.
pub mod flows;

pub use flows::{
    DepartmentDraft, DepartmentFlow, NotificationDraft, NotificationFlow, UserDraft, UserFlow,
};

use async_trait::async_trait;
use tracing::warn;

use crate::error::DashboardError;
use crate::session::CompanyScope;

/// View state for one entity kind. One list or one form at a time; there
/// is no parallel in-flight operation for the same kind.
#[derive(Debug, Clone)]
pub enum ViewState<T, D> {
    Idle,
    ListLoaded { items: Vec<T> },
    FormOpen { draft: D, error: Option<String> },
    Saving { draft: D },
}

/// Entity-kind behavior the controller drives: how to load the list,
/// build a draft from a selection, and persist a draft.
#[async_trait]
pub trait EntityFlow: Send + Sync {
    type Item: Clone + Send + Sync;
    type Draft: Clone + Send + Sync;

    fn kind(&self) -> &'static str;

    /// List for the scope; degraded (empty) results are still a list.
    async fn load(&self, scope: &CompanyScope) -> Vec<Self::Item>;

    /// Draft prefilled with the selected item's current field values.
    fn draft_for(&self, item: &Self::Item) -> Self::Draft;

    /// Blank draft for kinds that support creation, `None` otherwise.
    fn blank_draft(&self) -> Option<Self::Draft> {
        None
    }

    /// Persist the draft. An optional note is surfaced to the operator
    /// on success (e.g. generated credentials).
    async fn save(
        &self,
        scope: &CompanyScope,
        draft: &Self::Draft,
    ) -> Result<Option<String>, DashboardError>;
}

pub struct ListDetailController<F: EntityFlow> {
    flow: F,
    scope: CompanyScope,
    state: ViewState<F::Item, F::Draft>,
}

impl<F: EntityFlow> ListDetailController<F> {
    pub fn new(flow: F, scope: CompanyScope) -> Self {
        Self { flow, scope, state: ViewState::Idle }
    }

    pub fn state(&self) -> &ViewState<F::Item, F::Draft> {
        &self.state
    }

    pub fn scope(&self) -> &CompanyScope {
        &self.scope
    }

    /// Items of the current list view, empty outside `ListLoaded`.
    pub fn items(&self) -> &[F::Item] {
        match &self.state {
            ViewState::ListLoaded { items } => items,
            _ => &[],
        }
    }

    /// Load (or reload) the list for the current scope. Always lands in
    /// `ListLoaded`, even when the backend degraded to an empty result.
    pub async fn load_list(&mut self) {
        let items = self.flow.load(&self.scope).await;
        self.state = ViewState::ListLoaded { items };
    }

    /// Open the edit form for one listed item. Out-of-bounds selections
    /// are ignored.
    pub fn open(&mut self, index: usize) -> bool {
        let draft = match &self.state {
            ViewState::ListLoaded { items } => match items.get(index) {
                Some(item) => self.flow.draft_for(item),
                None => {
                    warn!(entity = self.flow.kind(), index, "selection out of bounds");
                    return false;
                }
            },
            _ => return false,
        };
        self.state = ViewState::FormOpen { draft, error: None };
        true
    }

    /// Open a blank form for entity kinds that support creation.
    pub fn open_blank(&mut self) -> bool {
        if !matches!(self.state, ViewState::ListLoaded { .. }) {
            return false;
        }
        match self.flow.blank_draft() {
            Some(draft) => {
                self.state = ViewState::FormOpen { draft, error: None };
                true
            }
            None => false,
        }
    }

    /// Mutate the open draft in place. Returns false outside `FormOpen`.
    pub fn edit(&mut self, apply: impl FnOnce(&mut F::Draft)) -> bool {
        match &mut self.state {
            ViewState::FormOpen { draft, .. } => {
                apply(draft);
                true
            }
            _ => false,
        }
    }

    /// Persist the open draft. Success reloads the list; failure returns
    /// to the form with the edited values and the error message intact.
    /// A save requested outside `FormOpen` is a logged no-op.
    pub async fn save(&mut self) -> Result<Option<String>, DashboardError> {
        let draft = match std::mem::replace(&mut self.state, ViewState::Idle) {
            ViewState::FormOpen { draft, .. } => draft,
            other => {
                self.state = other;
                warn!(entity = self.flow.kind(), "save requested outside an open form");
                return Ok(None);
            }
        };
        self.state = ViewState::Saving { draft: draft.clone() };
        match self.flow.save(&self.scope, &draft).await {
            Ok(note) => {
                self.load_list().await;
                Ok(note)
            }
            Err(err) => {
                warn!(entity = self.flow.kind(), "save failed: {}", err);
                self.state = ViewState::FormOpen { draft, error: Some(err.to_string()) };
                Err(err)
            }
        }
    }
}
