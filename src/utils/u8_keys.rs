//! Search helpers over the sorted discriminator-byte arrays of Node4 and Node16.
//!
//! Only the first `num_children` entries of `keys` are meaningful, and they are kept in
//! ascending order.

#[cfg(all(feature = "simd_keys", target_arch = "x86_64", target_feature = "sse2"))]
#[inline]
fn x86_64_sse_find_key_16_up_to(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::x86_64::{
        __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
    };

    let bitfield = unsafe {
        let key_vec = _mm_set1_epi8(key as i8);
        let results = _mm_cmpeq_epi8(key_vec, _mm_loadu_si128(keys.as_ptr() as *const __m128i));
        let mask = (1i32 << num_children) - 1;
        _mm_movemask_epi8(results) & mask
    };
    if bitfield != 0 {
        return Some(bitfield.trailing_zeros() as usize);
    }
    None
}

#[cfg(all(feature = "simd_keys", target_arch = "x86_64", target_feature = "sse2"))]
#[inline]
fn x86_64_sse_seek_insert_pos_16(key: u8, keys: &[u8; 16], num_children: usize) -> usize {
    use std::arch::x86_64::{
        __m128i, _mm_cmplt_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
        _mm_xor_si128,
    };

    let bitfield = unsafe {
        // SSE2 only has a signed byte compare; flipping the sign bit on both sides turns it into
        // an unsigned one.
        let bias = _mm_set1_epi8(i8::MIN);
        let key_vec = _mm_xor_si128(_mm_set1_epi8(key as i8), bias);
        let keys_vec = _mm_xor_si128(_mm_loadu_si128(keys.as_ptr() as *const __m128i), bias);
        let cmp = _mm_cmplt_epi8(key_vec, keys_vec);
        let mask = (1i32 << num_children) - 1;
        _mm_movemask_epi8(cmp) & mask
    };
    if bitfield != 0 {
        return bitfield.trailing_zeros() as usize;
    }
    num_children
}

fn binary_find_key(key: u8, keys: &[u8], num_children: usize) -> Option<usize> {
    keys[..num_children].binary_search(&key).ok()
}

/// Position of `key` among the first `num_children` sorted keys.
#[allow(unreachable_code)]
#[inline]
pub fn u8_keys_find_key_position_sorted<const WIDTH: usize>(
    key: u8,
    keys: &[u8; WIDTH],
    num_children: usize,
) -> Option<usize> {
    debug_assert!(num_children <= WIDTH);

    // Width 4 and under, just use linear search.
    if WIDTH <= 4 {
        return keys[..num_children].iter().position(|k| *k == key);
    }

    #[cfg(all(feature = "simd_keys", target_arch = "x86_64", target_feature = "sse2"))]
    if WIDTH == 16 {
        let keys: &[u8; 16] = unsafe { &*(keys.as_ptr() as *const [u8; 16]) };
        return x86_64_sse_find_key_16_up_to(key, keys, num_children);
    }

    binary_find_key(key, keys, num_children)
}

/// Index at which `key` must be inserted to keep the first `num_children` keys sorted.
#[allow(unreachable_code)]
#[inline]
pub fn u8_keys_find_insert_position_sorted<const WIDTH: usize>(
    key: u8,
    keys: &[u8; WIDTH],
    num_children: usize,
) -> usize {
    debug_assert!(num_children <= WIDTH);

    #[cfg(all(feature = "simd_keys", target_arch = "x86_64", target_feature = "sse2"))]
    if WIDTH == 16 {
        let keys: &[u8; 16] = unsafe { &*(keys.as_ptr() as *const [u8; 16]) };
        return x86_64_sse_seek_insert_pos_16(key, keys, num_children);
    }

    keys[..num_children].partition_point(|k| *k < key)
}
