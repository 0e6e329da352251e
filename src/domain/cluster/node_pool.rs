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

//! Node pool label and taint flags

use crate::infrastructure::platform::{NodeLabel, NodeTaint, SchedulerEffect};
use crate::shared::error::{Result, SymError};
use regex::Regex;

const TAINT_PATTERN: &str =
    r"^([a-z0-9\-_./]+)=([a-zA-Z0-9\-_.]+)=(NoSchedule|NoExecute|PreferNoSchedule)$";
const LABEL_PATTERN: &str = r"^([a-z0-9\-_./]+)=([a-zA-Z0-9\-_.]+)$";

/// Parses `key=value=Effect`.
pub fn parse_taint(input: &str) -> Result<NodeTaint> {
    let re = Regex::new(TAINT_PATTERN).map_err(|e| SymError::config_error(e.to_string()))?;

    let caps = re.captures(input).ok_or_else(|| {
        SymError::config_error(format!(
            "Taint {} could not be parsed. Format: key=value=NoSchedule. \
             Types currently supported are: NoSchedule, NoExecute and PreferNoSchedule.",
            input
        ))
    })?;

    let effect: SchedulerEffect = caps[3].parse().map_err(SymError::ConfigError)?;

    Ok(NodeTaint {
        key: caps[1].to_string(),
        value: caps[2].to_string(),
        effect,
    })
}

/// Parses `key=value`.
pub fn parse_label(input: &str) -> Result<NodeLabel> {
    let re = Regex::new(LABEL_PATTERN).map_err(|e| SymError::config_error(e.to_string()))?;

    let caps = re.captures(input).ok_or_else(|| {
        SymError::config_error(format!(
            "Label {} could not be parsed. Format: key=value",
            input
        ))
    })?;

    Ok(NodeLabel {
        key: caps[1].to_string(),
        value: caps[2].to_string(),
    })
}

pub fn parse_taints_and_labels(
    taints: &[String],
    labels: &[String],
) -> Result<(Vec<NodeTaint>, Vec<NodeLabel>)> {
    let taints = taints
        .iter()
        .map(|t| parse_taint(t))
        .collect::<Result<Vec<_>>>()?;
    let labels = labels
        .iter()
        .map(|l| parse_label(l))
        .collect::<Result<Vec<_>>>()?;

    Ok((taints, labels))
}
