//! Favorite star view state

use uchimo_core::ThreadId;

use crate::dto::FavoriteToggle;

use super::mirror::{MirrorSet, PendingToggle, SyncState};

/// Which threads the user has favorited
#[derive(Debug, Default)]
pub struct FavoriteView {
    mirror: MirrorSet<ThreadId>,
}

impl FavoriteView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, favorited: impl IntoIterator<Item = ThreadId>) {
        self.mirror.reset(favorited);
    }

    pub fn is_favorited(&self, thread_id: &ThreadId) -> bool {
        self.mirror.contains(thread_id)
    }

    pub fn state(&self, thread_id: &ThreadId) -> SyncState {
        self.mirror.state(thread_id)
    }

    pub fn mirror(&self) -> &MirrorSet<ThreadId> {
        &self.mirror
    }

    pub fn begin(&mut self, thread_id: ThreadId) -> PendingToggle<ThreadId> {
        self.mirror.begin(thread_id)
    }

    pub fn confirm(&mut self, token: PendingToggle<ThreadId>, result: FavoriteToggle) -> bool {
        self.mirror.confirm(token, result.new_is_favorited)
    }

    pub fn rollback(&mut self, token: PendingToggle<ThreadId>) -> bool {
        self.mirror.rollback(token)
    }

    pub fn acknowledge(&mut self, thread_id: &ThreadId) {
        self.mirror.acknowledge(thread_id);
    }

    pub fn detach(&mut self) {
        self.mirror.detach();
    }
}
