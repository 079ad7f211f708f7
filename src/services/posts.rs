use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::OnceCell;
use tracing::{debug, error, info};
use validator::Validate;

use crate::{
    models::posts::{FieldErrors, Post, PostForm},
    repositories::PostStore,
};

/// Where the submission flow is. `Succeeded` and `Failed` only last while
/// the outcome is handled; the controller returns to `Idle` right after.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything the page is rendered from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub posts: Vec<Post>,
    pub is_loading: bool,
    pub show_form: bool,
    pub form: PostForm,
    pub errors: FieldErrors,
    pub phase: SubmitPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field was blank; the store was not called.
    Invalid(FieldErrors),
    /// A submission is already in flight.
    Busy,
    /// The form is hidden, so there is nothing to submit.
    FormClosed,
    Succeeded,
    Failed,
}

/// Owns the view state of the blog page and drives the store calls.
pub struct PostController {
    store: Arc<dyn PostStore>,
    state: RwLock<ViewState>,
    mounted: OnceCell<()>,
}

impl PostController {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            state: RwLock::new(ViewState::default()),
            mounted: OnceCell::new(),
        }
    }

    /// Initial load. Runs the fetch once no matter how often it is called.
    pub async fn mount(&self) {
        self.mounted
            .get_or_init(|| async {
                info!("mounting blog view");
                self.fetch_posts().await;
            })
            .await;
    }

    pub fn snapshot(&self) -> ViewState {
        self.read().clone()
    }

    /// Flips form visibility and returns the new value. `draft` holds what
    /// the open form contained; it is kept unvalidated so reopening shows it.
    /// While the form is hidden there is nothing to keep and `draft` is ignored.
    pub fn toggle_form(&self, draft: PostForm) -> bool {
        let mut state = self.write();
        if state.show_form {
            state.form = draft;
        }
        state.show_form = !state.show_form;
        debug!(show_form = state.show_form, "toggled post form");
        state.show_form
    }

    pub async fn submit(&self, form: PostForm) -> SubmitOutcome {
        {
            let mut state = self.write();
            if state.is_loading {
                debug!("submission ignored while another is in flight");
                return SubmitOutcome::Busy;
            }
            if !state.show_form {
                debug!("submission ignored while the form is hidden");
                return SubmitOutcome::FormClosed;
            }

            state.form = form.clone();
            if let Err(errors) = form.validate() {
                state.errors = FieldErrors::from(&errors);
                debug!(errors = ?state.errors, "post form rejected");
                return SubmitOutcome::Invalid(state.errors.clone());
            }

            state.errors = FieldErrors::default();
            state.is_loading = true;
            state.phase = SubmitPhase::Submitting;
        }

        let _settle = Settle(self);

        match self
            .store
            .create_post(&form.title, &form.body, &form.author)
            .await
        {
            Ok(()) => {
                self.write().phase = SubmitPhase::Succeeded;
                self.fetch_posts().await;
                let mut state = self.write();
                state.show_form = false;
                state.form = PostForm::default();
                state.errors = FieldErrors::default();
                info!(title = %form.title, "post created");
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                self.write().phase = SubmitPhase::Failed;
                error!("Error creating post: {}", err);
                SubmitOutcome::Failed
            }
        }
    }

    /// Replaces the post list on success; on failure the current list stays.
    async fn fetch_posts(&self) {
        match self.store.fetch_all_posts().await {
            Ok(posts) => {
                debug!(count = posts.len(), "fetched posts");
                self.write().posts = posts;
            }
            Err(err) => error!("Error fetching posts: {}", err),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the loading flag when a submission settles, including when the
/// request future is dropped part way.
struct Settle<'a>(&'a PostController);

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        let mut state = self.0.write();
        state.is_loading = false;
        state.phase = SubmitPhase::Idle;
    }
}
