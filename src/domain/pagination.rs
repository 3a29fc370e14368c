use serde::Serialize;

/// 1-based page selector for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: u32,
  pub per_page: u32,
}

impl PageRequest {
  pub const DEFAULT_PER_PAGE: u32 = 10;

  /// Pages below 1 and a zero page size are clamped
  pub fn new(page: Option<u32>, per_page: u32) -> Self {
    Self {
      page: page.unwrap_or(1).max(1),
      per_page: per_page.max(1),
    }
  }

  pub fn limit(&self) -> i64 {
    i64::from(self.per_page)
  }

  pub fn offset(&self) -> i64 {
    i64::from(self.page - 1) * i64::from(self.per_page)
  }
}

impl Default for PageRequest {
  fn default() -> Self {
    Self::new(None, Self::DEFAULT_PER_PAGE)
  }
}

/// One page of results plus the total row count
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub request: PageRequest,
  pub total: i64,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
    Self {
      items,
      request,
      total,
    }
  }

  /// Last page number; an empty result still has page 1
  pub fn last_page(&self) -> u32 {
    let per_page = i64::from(self.request.per_page);
    let pages = (self.total.max(0) + per_page - 1) / per_page;
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
  }

  pub fn meta(&self) -> PageMeta {
    PageMeta {
      current_page: self.request.page,
      per_page: self.request.per_page,
      total: self.total,
      last_page: self.last_page(),
    }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      request: self.request,
      total: self.total,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
  pub current_page: u32,
  pub per_page: u32,
  pub total: i64,
  pub last_page: u32,
}
