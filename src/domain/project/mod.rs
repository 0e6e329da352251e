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

//! Project descriptor resolution

pub mod config;
pub mod descriptor;
pub mod reference;
pub mod template;

pub use config::{absolute_path, ProjectConfig};
pub use descriptor::{Deployment, ProjectDescriptor, Test};
pub use reference::resolve_project;
pub use template::render_secrets;
