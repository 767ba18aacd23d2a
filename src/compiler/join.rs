//! Join mode: merge compiled files of the same kind and group into one bundle.

use std::fs;

use serde::Serialize;

use super::output::{StagedWrites, joined_file_name};
use super::{CompiledFile, Group, JoinedFiles, OutputTarget};
use crate::asset::AssetKind;
use crate::debug;
use crate::error::{Result, WebHeadError};
use crate::utils::FxIndexMap;
use crate::utils::path::public_url;

/// One merged output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedBundle {
    /// Public URL of the bundle.
    pub url: String,
    /// Source paths merged into it, in join order.
    pub members: Vec<String>,
}

/// Group compiled files by `(kind, group)` and stage a bundle for each group
/// whose cache entry does not exist yet.
pub(super) fn join_files(
    target: &OutputTarget,
    compiled: &[CompiledFile],
    staged: &mut StagedWrites,
) -> Result<JoinedFiles> {
    let mut groups: FxIndexMap<(AssetKind, &Group), Vec<&CompiledFile>> = FxIndexMap::default();
    for file in compiled {
        groups.entry((file.kind, &file.group)).or_default().push(file);
    }

    let mut joined = JoinedFiles::default();
    for ((kind, group), members) in groups {
        let keys: Vec<(&str, &str)> = members
            .iter()
            .map(|m| (m.source.as_str(), m.file_name.as_str()))
            .collect();
        let file_name = joined_file_name(kind, group.as_deref(), &keys);

        if target.dir.join(&file_name).is_file() {
            debug!("cache"; "hit: {}", file_name);
        } else {
            let content = concat_members(target, &members, staged)?;
            debug!("compile"; "joined {} file(s) -> {}", members.len(), file_name);
            staged.push(file_name.clone(), content);
        }

        let bundle = JoinedBundle {
            url: public_url(&target.public_prefix, &file_name),
            members: members.iter().map(|m| m.source.clone()).collect(),
        };
        joined
            .entry(kind)
            .or_default()
            .insert(group.clone(), bundle);
    }
    Ok(joined)
}

/// Concatenate member contents, each preceded by a comment naming its source.
fn concat_members(
    target: &OutputTarget,
    members: &[&CompiledFile],
    staged: &StagedWrites,
) -> Result<String> {
    let mut out = String::new();
    for member in members {
        let content = match staged.get(&member.file_name) {
            Some(content) => content.to_string(),
            None => {
                let path = target.dir.join(&member.file_name);
                fs::read_to_string(&path).map_err(|e| WebHeadError::io(&path, e))?
            }
        };
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("/* source: {} */\n", comment_safe(&member.source)));
        out.push_str(&content);
    }
    Ok(out)
}

/// Keep a path from closing the surrounding comment early.
fn comment_safe(path: &str) -> String {
    path.replace("*/", "*\\/")
}
