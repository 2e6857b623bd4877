//! Bounded worker pool over merger trees.
//!
//! Trees are disjoint subgraphs, so the parallel build stages hand each
//! worker exclusive mutable access to one tree at a time through a
//! crossbeam channel. When several workers fail in the same stage, the
//! observed failure with the lowest tree id is reported.

use std::thread;

use crossbeam::channel;

use crate::model::{MergerTree, TreeId};

use super::error::BuildError;

/// Run `f` over every tree with at most `threads` workers.
pub(crate) fn for_each_tree<F>(
    threads: usize,
    trees: &mut [MergerTree],
    f: F,
) -> Result<(), BuildError>
where
    F: Fn(&mut MergerTree) -> Result<(), BuildError> + Sync,
{
    let threads = threads.max(1).min(trees.len().max(1));
    if threads == 1 {
        for tree in trees.iter_mut() {
            f(tree)?;
        }
        return Ok(());
    }

    let mut failures: Vec<(TreeId, BuildError)> = thread::scope(|scope| {
        let (tx, rx) = channel::unbounded::<&mut MergerTree>();
        for tree in trees.iter_mut() {
            tx.send(tree).expect("tree queue receiver alive");
        }
        drop(tx);

        let mut workers = Vec::with_capacity(threads);
        for _ in 0..threads {
            let rx = rx.clone();
            let f = &f;
            workers.push(scope.spawn(move || {
                while let Ok(tree) = rx.recv() {
                    let id = tree.id();
                    if let Err(err) = f(tree) {
                        return Some((id, err));
                    }
                }
                None
            }));
        }

        workers
            .into_iter()
            .filter_map(|worker| worker.join().expect("tree worker panicked"))
            .collect()
    });

    failures.sort_by_key(|(id, _)| *id);
    match failures.into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}
