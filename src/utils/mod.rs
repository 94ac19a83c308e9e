use regex_lite::Regex;
use std::sync::OnceLock;

/// Suffix the system appends to a disk path to name one of its partitions.
pub const PARTITION_SUFFIX_PATTERN: &str = r"-part[0-9]*";

fn partition_suffix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PARTITION_SUFFIX_PATTERN).ok())
        .as_ref()
}

/// Remove the "-partNNN" suffix from a partition device path.
/// e.g., "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0-part2" -> "/dev/disk/by-path/pci-0000:00:0d.0-ata-1.0"
pub fn strip_partition_number(path: &str) -> String {
    match partition_suffix() {
        Some(re) => re.replace_all(path, "").to_string(),
        None => path.to_string(),
    }
}

/// Split a comma separated inventory value into its items.
/// An empty input yields an empty list rather than a single empty item.
pub fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(|s| s.to_string()).collect()
}

/// Convert MiB to whole GiB, rounding down.
pub fn mib_to_gib(mib: i64) -> i64 {
    mib / 1024
}
