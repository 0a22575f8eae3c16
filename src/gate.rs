use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared admission. Dropping it exits the gate as a reader.
pub type ReadAdmission<'a, T> = RwLockReadGuard<'a, T>;

/// Exclusive admission. Dropping it exits the gate as a writer.
pub type WriteAdmission<'a, T> = RwLockWriteGuard<'a, T>;

/// Reader/writer admission control over a single owned value.
///
/// Any number of readers may hold the gate at once while no writer does; a
/// writer is admitted only when there are no readers and no other writer.
/// Waiting writers stop new readers from being admitted, so a steady stream
/// of readers cannot starve them.
///
/// Admissions are RAII guards: the gate is left on every exit path of the
/// holder, early returns and unwinding included.
pub struct AccessGate<T> {
    inner: RwLock<T>,
}

impl<T> AccessGate<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    /// Blocks while a writer is admitted.
    pub fn enter_as_reader(&self) -> ReadAdmission<'_, T> {
        let admission = self.inner.read();
        tracing::trace!("entered gate as reader");
        admission
    }

    /// Blocks while any reader or writer is admitted.
    pub fn enter_as_writer(&self) -> WriteAdmission<'_, T> {
        let admission = self.inner.write();
        tracing::trace!("entered gate as writer");
        admission
    }

    /// Unguarded access; the `&mut` borrow already rules out other holders.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    #[cfg(test)]
    pub(crate) fn is_writer_active(&self) -> bool {
        self.inner.is_locked_exclusive()
    }
}
