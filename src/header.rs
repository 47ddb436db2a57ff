use anyhow::{Result, bail};

use crate::config::ToolConfig;

pub fn shebang_is_valid(config: &ToolConfig, lines: &[String]) -> bool {
    lines
        .first()
        .is_some_and(|line| config.shebang_canonical.is_match(line))
}

pub fn coding_is_valid(config: &ToolConfig, lines: &[String]) -> bool {
    if lines.len() >= 2 && config.coding_canonical.is_match(&lines[1]) {
        return true;
    }
    // a coding declaration on the first line also counts
    lines
        .first()
        .is_some_and(|line| config.coding_canonical.is_match(line))
}

/// Idempotent three-way repair: missing shebang is inserted, a wrong one is
/// replaced in place, a canonical one is left untouched. Returns whether the
/// sequence changed so callers can skip the rewrite.
pub fn fix_shebang(config: &ToolConfig, lines: &mut Vec<String>) -> bool {
    let first = lines.first();
    if first.is_some_and(|line| config.shebang_canonical.is_match(line)) {
        return false;
    }
    if first.is_some_and(|line| config.shebang_marker.is_match(line)) {
        lines[0] = config.shebang_line.clone();
    } else {
        lines.insert(0, config.shebang_line.clone());
    }
    true
}

/// Idempotent three-way repair for the coding declaration. Must run after
/// `fix_shebang`: line 0 has to be the canonical shebang already.
pub fn fix_coding(config: &ToolConfig, lines: &mut Vec<String>) -> Result<bool> {
    let has_canonical_shebang = lines
        .first()
        .is_some_and(|line| config.shebang_canonical.is_match(line));
    if !has_canonical_shebang {
        bail!("coding fix requires a canonical shebang on the first line");
    }

    if lines.len() == 1 {
        lines.push(config.coding_line.clone());
        return Ok(true);
    }

    if config.coding_canonical.is_match(&lines[1]) {
        return Ok(false);
    }

    if config.coding_any.is_match(&lines[1]) {
        lines[1] = config.coding_line.clone();
    } else {
        lines.insert(1, config.coding_line.clone());
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ToolConfig {
        ToolConfig::new().expect("config")
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn empty_file_has_invalid_headers() {
        let config = config();
        assert!(!shebang_is_valid(&config, &[]));
        assert!(!coding_is_valid(&config, &[]));
    }

    #[test]
    fn canonical_headers_pass_checks() {
        let config = config();
        let content = lines(&["#!/usr/bin/env python\n", "# -*- coding: utf-8 -*-\n"]);
        assert!(shebang_is_valid(&config, &content));
        assert!(coding_is_valid(&config, &content));
    }

    #[test]
    fn coding_on_first_line_counts_for_any_length() {
        let config = config();
        let content = lines(&["# -*- coding: utf-8 -*-\n", "import os\n"]);
        assert!(coding_is_valid(&config, &content));
    }

    #[test]
    fn fix_shebang_inserts_into_empty_file() {
        let config = config();
        let mut content = Vec::new();
        assert!(fix_shebang(&config, &mut content));
        assert_eq!(content, lines(&["#!/usr/bin/env python"]));
    }

    #[test]
    fn fix_shebang_inserts_when_marker_absent() {
        let config = config();
        let mut content = lines(&["import os\n"]);
        assert!(fix_shebang(&config, &mut content));
        assert_eq!(content, lines(&["#!/usr/bin/env python", "import os\n"]));
    }

    #[test]
    fn fix_shebang_replaces_wrong_directive_in_place() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/python\n"]);
        assert!(fix_shebang(&config, &mut content));
        assert_eq!(content, lines(&["#!/usr/bin/env python"]));
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn fix_shebang_is_a_no_op_on_canonical_input() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/env python\n", "x = 1\n"]);
        assert!(!fix_shebang(&config, &mut content));
        assert_eq!(content, lines(&["#!/usr/bin/env python\n", "x = 1\n"]));
    }

    #[test]
    fn fix_shebang_is_idempotent() {
        let config = config();
        let mut content = lines(&["#!/bin/sh\n", "x = 1\n"]);
        assert!(fix_shebang(&config, &mut content));
        let once = content.clone();
        assert!(!fix_shebang(&config, &mut content));
        assert_eq!(content, once);
    }

    #[test]
    fn fix_coding_appends_after_lone_shebang() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/env python\n"]);
        assert!(fix_coding(&config, &mut content).expect("fix"));
        assert_eq!(content.len(), 2);
        assert_eq!(content[1], "# -*- coding: utf-8 -*-");
    }

    #[test]
    fn fix_coding_replaces_wrong_declaration_in_place() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/env python\n", "# coding: latin-1\n"]);
        assert!(fix_coding(&config, &mut content).expect("fix"));
        assert_eq!(content.len(), 2);
        assert_eq!(content[1], "# -*- coding: utf-8 -*-");
    }

    #[test]
    fn fix_coding_inserts_when_declaration_absent() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/env python\n", "import os\n"]);
        assert!(fix_coding(&config, &mut content).expect("fix"));
        assert_eq!(content.len(), 3);
        assert_eq!(content[1], "# -*- coding: utf-8 -*-");
        assert_eq!(content[2], "import os\n");
    }

    #[test]
    fn fix_coding_is_a_no_op_on_canonical_input() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/env python\n", "# -*- coding: utf-8 -*-\n"]);
        assert!(!fix_coding(&config, &mut content).expect("fix"));
    }

    #[test]
    fn fix_coding_is_idempotent() {
        let config = config();
        let mut content = lines(&["#!/usr/bin/env python\n", "import os\n"]);
        assert!(fix_coding(&config, &mut content).expect("fix"));
        let once = content.clone();
        assert!(!fix_coding(&config, &mut content).expect("fix"));
        assert_eq!(content, once);
    }

    #[test]
    fn fix_coding_rejects_missing_shebang_precondition() {
        let config = config();
        let mut content = lines(&["import os\n"]);
        assert!(fix_coding(&config, &mut content).is_err());
    }
}
