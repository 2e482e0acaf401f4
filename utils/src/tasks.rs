use std::thread;

use crossbeam_channel::unbounded;

/// Stage-scoped worker pool
///
/// Each pipeline stage fans its independent tasks out to a pool that lives
/// only for the duration of the call: spawn the workers, feed the job
/// channel, drop the sender and join.  The join is the stage barrier, so
/// callers can rely on every task having finished (or failed) on return.
///
/// A failing task never stops its siblings.  Failures are collected per
/// task and all of them are logged and reported after the barrier.
pub fn run_stage<J, F>(
    name: &str,
    n_tasks: usize,
    jobs: Vec<(String, J)>,
    f: F,
) -> anyhow::Result<()>
where
    J: Send,
    F: Fn(&str, J) -> anyhow::Result<()> + Sync,
{
    let n_jobs = jobs.len();
    if n_jobs == 0 {
        debug!("No {} jobs to run", name);
        return Ok(());
    }
    let nt = n_tasks.clamp(1, n_jobs);
    debug!("Running {} {} jobs on {} workers", n_jobs, name, nt);

    let mut failures = Vec::new();
    thread::scope(|sc| {
        let (snd, rcv) = unbounded::<(String, J)>();
        let f = &f;

        // Spawn workers sharing the job channel
        let handles: Vec<_> = (0..nt)
            .map(|ix| {
                let r = rcv.clone();
                sc.spawn(move || {
                    debug!("{} worker {} starting up", name, ix + 1);
                    let mut fails: Vec<(String, anyhow::Error)> = Vec::new();
                    while let Ok((label, job)) = r.recv() {
                        trace!("{} worker {} processing {}", name, ix + 1, label);
                        if let Err(e) = f(&label, job) {
                            fails.push((label, e))
                        }
                    }
                    debug!("{} worker {} closing down", name, ix + 1);
                    fails
                })
            })
            .collect();
        drop(rcv);

        for j in jobs {
            if snd.send(j).is_err() {
                error!("Error sending job to {} workers", name);
                break;
            }
        }
        drop(snd);

        for (ix, jh) in handles.into_iter().enumerate() {
            match jh.join() {
                Ok(mut v) => failures.append(&mut v),
                Err(_) => failures.push((
                    format!("{} worker {}", name, ix + 1),
                    anyhow!("worker thread panicked"),
                )),
            }
        }
    });

    if failures.is_empty() {
        debug!("All {} {} jobs completed", n_jobs, name);
        Ok(())
    } else {
        for (label, e) in failures.iter() {
            error!("{} task {} failed: {:#}", name, label, e);
        }
        let labels: Vec<_> = failures.iter().map(|(l, _)| l.as_str()).collect();
        Err(anyhow!(
            "{} of {} {} tasks failed ({})",
            failures.len(),
            n_jobs,
            name,
            labels.join(", ")
        ))
    }
}
