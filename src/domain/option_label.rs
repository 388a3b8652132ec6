//! Labels of the memory configurable option, e.g. `2048|2GB` or `1536|1.5GB`.

const MB_PER_GB: u64 = 1024;

/// Formats a memory limit in MB the way the billing catalog names its options.
///
/// Whole gigabytes print without a decimal point; anything else prints with
/// one decimal, rounded half to even.
pub fn format_memory_option(memory_mb: u64) -> String {
    if memory_mb % MB_PER_GB == 0 {
        return format!("{}|{}GB", memory_mb, memory_mb / MB_PER_GB);
    }

    let scaled = u128::from(memory_mb) * 10;
    let divisor = u128::from(MB_PER_GB);
    let mut tenths = scaled / divisor;
    let remainder = scaled % divisor;
    if remainder * 2 > divisor || (remainder * 2 == divisor && tenths % 2 == 1) {
        tenths += 1;
    }

    format!("{}|{}.{}GB", memory_mb, tenths / 10, tenths % 10)
}
