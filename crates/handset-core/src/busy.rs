use std::cell::Cell;

/// Holds an in-progress flag raised for as long as the guard lives.
///
/// The flag is advisory; front-ends read it to disable controls while an
/// operation runs.
pub(crate) struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
  pub(crate) fn enter(flag: &'a Cell<bool>) -> Self {
    flag.set(true);
    Self(flag)
  }
}

impl Drop for BusyGuard<'_> {
  fn drop(&mut self) { self.0.set(false); }
}
