//! Key to partition assignment.
//!
//! Keyed messages always land in the same partition for a given partition
//! count: the 32-bit FNV-1a hash of the key bytes, reinterpreted as signed,
//! modulo the partition count, absolute value. Other producers using the
//! same "hash" partitioner place the same keys in the same partitions.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME))
}

/// Partition for a keyed message, or `None` if the topic has no partitions.
pub fn for_key(key: &[u8], partition_count: i32) -> Option<i32> {
    if partition_count <= 0 {
        return None;
    }
    Some((fnv1a(key).cast_signed() % partition_count).abs())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn fnv1a_reference_vectors() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn no_partitions_no_assignment() {
        assert_eq!(for_key(b"user-42", 0), None);
        assert_eq!(for_key(b"user-42", -3), None);
    }

    #[test]
    fn negative_hash_folds_positive() {
        // 0xbf9cf968 is negative as i32
        let expected = (0xbf9c_f968_u32.cast_signed() % 7).abs();
        assert_eq!(for_key(b"foobar", 7), Some(expected));
    }

    proptest! {
        #[test]
        fn assignment_in_range_and_stable(key in proptest::collection::vec(any::<u8>(), 0..64), count in 1i32..512) {
            let first = for_key(&key, count);
            prop_assert_eq!(first, for_key(&key, count));
            let p = first.unwrap();
            prop_assert!((0..count).contains(&p));
        }
    }
}
