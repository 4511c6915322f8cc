use std::collections::HashMap;

use crate::LogTargetConfig;

/// Maps `::`-separated target paths to levels. The most specific matching
/// statement wins.
#[derive(Debug, Default)]
pub(crate) struct FilterTrie {
    level:    Option<tracing::Level>,
    children: HashMap<String, FilterTrie>,
}

impl FilterTrie {
    pub(crate) fn from_statements<'a>(
        statements: impl IntoIterator<Item = &'a LogTargetConfig>,
    ) -> Self {
        let mut root = Self::default();
        for statement in statements {
            let node = statement
                .path
                .iter()
                .fold(&mut root, |node, segment| {
                    node.children.entry(segment.clone()).or_default()
                });
            node.level = Some(statement.level);
        }
        root
    }

    pub(crate) fn level_for_target<'a>(
        &self,
        target: impl IntoIterator<Item = &'a str>,
    ) -> Option<tracing::Level> {
        let mut node = self;
        let mut found = self.level;
        for segment in target {
            let Some(child) = node.children.get(segment) else {
                break
            };
            node = child;
            found = child.level.or(found);
        }
        found
    }
}
