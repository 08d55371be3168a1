use std::{
    sync::{Condvar, Mutex, PoisonError},
    thread::{self, ThreadId},
};

/// Serializes auto-wiring across threads
///
/// Reentrant, the owning thread keeps auto-wiring dependencies recursively
/// while every other thread waits.
#[derive(Default)]
pub(crate) struct BuildLock {
    /// Owning thread and how often it acquired the lock
    owner: Mutex<Option<(ThreadId, usize)>>,
    released: Condvar,
}

impl BuildLock {
    pub(crate) fn acquire(&self) -> BuildGuard<'_> {
        let current = thread::current().id();
        let mut owner = self.owner.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match owner.as_ref().map(|(thread, _)| *thread) {
                None => {
                    *owner = Some((current, 1));
                    break;
                }
                Some(thread) if thread == current => {
                    if let Some((_, count)) = owner.as_mut() {
                        *count += 1;
                    }
                    break;
                }
                Some(_) => {
                    owner = self
                        .released
                        .wait(owner)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }

        BuildGuard { lock: self }
    }
}

/// Releases one acquisition of the [BuildLock] on drop, also while unwinding
pub(crate) struct BuildGuard<'l> {
    lock: &'l BuildLock,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        let mut owner = self
            .lock
            .owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some((_, count)) = owner.as_mut() {
            *count -= 1;
            if *count == 0 {
                *owner = None;
                self.lock.released.notify_all();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;

    #[test]
    fn owner_can_reenter() {
        let lock = BuildLock::default();
        let outer = lock.acquire();
        let inner = lock.acquire();
        drop(inner);
        drop(outer);
        // Fully released, so a fresh acquire does not block
        let _again = lock.acquire();
    }

    #[test]
    fn other_threads_wait_for_release() {
        let lock = BuildLock::default();
        let inside = AtomicUsize::new(0);
        let overlapped = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let _guard = lock.acquire();
                    if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                        overlapped.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_millis(5));
                    inside.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert_eq!(overlapped.load(Ordering::SeqCst), 0);
    }
}
