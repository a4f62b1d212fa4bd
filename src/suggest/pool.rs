use crossbeam::channel;
use std::thread;

/// Runs a batch of independent jobs with bounded parallelism.
///
/// Every job executes exactly once; `run_all` joins all workers before
/// returning, so no result is lost or delivered late. Result order is
/// completion order, not submission order; callers correlate by the job's
/// own fields when they need to.
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn run_all<J, R, F>(&self, jobs: Vec<J>, run: F) -> Vec<R>
    where
        J: Send,
        R: Send,
        F: Fn(J) -> R + Sync,
    {
        if jobs.is_empty() {
            return Vec::new();
        }
        let worker_count = self.workers.min(jobs.len());

        let (job_tx, job_rx) = channel::unbounded::<J>();
        let (result_tx, result_rx) = channel::unbounded::<R>();
        for job in jobs {
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..worker_count {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let run = &run;
                scope.spawn(move || {
                    for job in job_rx.iter() {
                        let _ = result_tx.send(run(job));
                    }
                });
            }
        });

        drop(result_tx);
        result_rx.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn runs_every_job_exactly_once() {
        let pool = WorkerPool::new(4);
        let executions = AtomicUsize::new(0);
        let mut results = pool.run_all((0..32).collect(), |n: usize| {
            executions.fetch_add(1, Ordering::SeqCst);
            n * 2
        });
        results.sort_unstable();
        assert_eq!(executions.load(Ordering::SeqCst), 32);
        assert_eq!(results, (0..32).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn parallelism_is_bounded_by_worker_count() {
        let pool = WorkerPool::new(2);
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        pool.run_all((0..8).collect(), |_: usize| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(15));
            active.fetch_sub(1, Ordering::SeqCst);
        });
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn empty_batch_returns_immediately() {
        let pool = WorkerPool::new(3);
        let results: Vec<usize> = pool.run_all(Vec::new(), |n: usize| n);
        assert!(results.is_empty());
    }
}
