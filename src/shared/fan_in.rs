// Copyright 2025 Symbiosis Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fan-in for spawned tasks with first-error-wins semantics

use crate::shared::error::{Result, SymError};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinHandle;

/// Waits on every handle and returns the values in spawn order.
///
/// The first task error is returned as soon as it is observed. Tasks that are
/// still running at that point are detached, not aborted: they run to
/// completion in the background and their results are discarded.
pub async fn join_fail_fast<T>(handles: Vec<JoinHandle<Result<T>>>) -> Result<Vec<T>>
where
    T: Send + 'static,
{
    let total = handles.len();
    let mut pending: FuturesUnordered<_> = handles
        .into_iter()
        .enumerate()
        .map(|(idx, handle)| async move { (idx, handle.await) })
        .collect();

    let mut values: Vec<Option<T>> = (0..total).map(|_| None).collect();

    while let Some((idx, joined)) = pending.next().await {
        match joined {
            Ok(Ok(value)) => values[idx] = Some(value),
            Ok(Err(e)) => return Err(e),
            Err(e) => return Err(SymError::TaskFailed(e.to_string())),
        }
    }

    Ok(values.into_iter().flatten().collect())
}
