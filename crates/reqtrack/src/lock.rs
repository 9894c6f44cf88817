#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(all(feature = "std", feature = "parking-lot"))]
pub(crate) use parking_lot::{Mutex, MutexGuard};
#[cfg(all(feature = "std", not(feature = "parking-lot")))]
pub(crate) use std::sync::{Mutex, MutexGuard};

use crate::Result;

/// Acquires shared access. Fails only on a poisoned std lock.
pub(crate) fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    #[cfg(feature = "parking-lot")]
    {
        Ok(lock.read())
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        Ok(lock.read()?)
    }
}

/// Acquires exclusive access. Fails only on a poisoned std lock.
pub(crate) fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    #[cfg(feature = "parking-lot")]
    {
        Ok(lock.write())
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        Ok(lock.write()?)
    }
}

/// Locks a mutex whose protected value stays valid across a panic, so a
/// poisoned std mutex is recovered instead of reported.
#[cfg(feature = "std")]
pub(crate) fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    #[cfg(feature = "parking-lot")]
    {
        mutex.lock()
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
