//! Fixed registry of application pages

use heapless::Vec;

use crate::traits::{Page, PageId};

/// Maximum pages per registry
pub const MAX_PAGES: usize = 16;

/// Reasons a registry cannot be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No pages were supplied
    Empty,
    /// More than [`MAX_PAGES`] pages were supplied
    TooManyPages,
    /// Two pages report the same id
    DuplicateId(PageId),
}

/// Lifecycle flags of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageState {
    /// The page is the one on screen
    pub active: bool,
    /// The page's one-time init has run
    pub initialized: bool,
}

pub(crate) struct PageSlot<'p> {
    pub(crate) page: &'p mut dyn Page,
    pub(crate) state: PageState,
}

/// Ordered, immutable set of pages
///
/// Built once from application-owned pages; the lifecycle flags live here
/// rather than in the pages, which can only read them through their
/// [`PageLink`](crate::PageLink).
pub struct PageRegistry<'p> {
    slots: Vec<PageSlot<'p>, MAX_PAGES>,
}

impl<'p> PageRegistry<'p> {
    /// Register pages in order; the first one is the initial page
    pub fn new<I>(pages: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'p mut dyn Page>,
    {
        let mut slots: Vec<PageSlot<'p>, MAX_PAGES> = Vec::new();

        for page in pages {
            let id = page.id();
            if slots.iter().any(|slot| slot.page.id() == id) {
                return Err(RegistryError::DuplicateId(id));
            }
            slots
                .push(PageSlot {
                    page,
                    state: PageState::default(),
                })
                .map_err(|_| RegistryError::TooManyPages)?;
        }

        if slots.is_empty() {
            return Err(RegistryError::Empty);
        }

        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; an empty registry cannot be built
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registration index of `page_id`
    pub fn position(&self, page_id: PageId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.page.id() == page_id)
    }

    pub fn contains(&self, page_id: PageId) -> bool {
        self.position(page_id).is_some()
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = PageId> + use<'_, 'p> {
        self.slots.iter().map(|slot| slot.page.id())
    }

    pub fn state(&self, page_id: PageId) -> Option<PageState> {
        self.position(page_id).map(|index| self.slots[index].state)
    }

    pub(crate) fn slot(&self, index: usize) -> &PageSlot<'p> {
        &self.slots[index]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut PageSlot<'p> {
        &mut self.slots[index]
    }
}
