//! Unit tests for content module
//!
//! Tests cover:
//! - Exact buffer length with and without wrapping
//! - Character range
//! - Line layout and remainder placement
//! - Seeding behaviour

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::ContentError;

    fn in_char_range(byte: u8) -> bool {
        (CHAR_LOW..=CHAR_HIGH).contains(&byte)
    }

    #[test]
    fn test_no_wrap_length_is_exact() {
        let mut generator = ContentGenerator::with_seed(1);
        for size in [0u64, 1, 2, 79, 80, 81, 1000, 4096, 65_537] {
            let content = generator
                .generate(&GenerationRequest::new(size, false, 0))
                .unwrap();
            assert_eq!(content.len() as u64, size, "size {}", size);
        }
    }

    #[test]
    fn test_wrap_with_zero_line_length_is_single_block() {
        let content = ContentGenerator::with_seed(2)
            .generate(&GenerationRequest::new(500, true, 0))
            .unwrap();
        assert_eq!(content.len(), 500);
        assert!(content.iter().all(|b| in_char_range(*b)));
    }

    #[test]
    fn test_wrap_length_includes_terminator_overhead() {
        let mut generator = ContentGenerator::with_seed(3);
        for (size, line_length) in [(100u64, 80u64), (160, 80), (1000, 7), (1, 1), (10_000, 72)] {
            let content = generator
                .generate(&GenerationRequest::new(size, true, line_length))
                .unwrap();
            let expected = size + (size / line_length) * 2;
            assert_eq!(content.len() as u64, expected, "{} / {}", size, line_length);
        }
    }

    #[test]
    fn test_lf_terminator_overhead() {
        let request = GenerationRequest::new(1000, true, 100).with_line_ending(LineEnding::Lf);
        let content = ContentGenerator::with_seed(4).generate(&request).unwrap();
        assert_eq!(content.len(), 1010);
        assert_eq!(content.iter().filter(|b| **b == b'\n').count(), 10);
        assert!(!content.contains(&b'\r'));
    }

    #[test]
    fn test_all_characters_in_range() {
        let mut generator = ContentGenerator::with_seed(5);

        let block = generator
            .generate(&GenerationRequest::new(20_000, false, 0))
            .unwrap();
        assert!(block.iter().all(|b| in_char_range(*b)));

        let wrapped = generator
            .generate(&GenerationRequest::new(20_000, true, 64))
            .unwrap();
        assert!(
            wrapped
                .iter()
                .all(|b| in_char_range(*b) || *b == b'\r' || *b == b'\n')
        );
    }

    #[test]
    fn test_range_bounds_are_reachable() {
        let content = ContentGenerator::with_seed(6)
            .generate(&GenerationRequest::new(100_000, false, 0))
            .unwrap();
        assert!(content.contains(&CHAR_LOW));
        assert!(content.contains(&CHAR_HIGH));
    }

    #[test]
    fn test_example_layout_100_bytes_80_chars() {
        let content = ContentGenerator::with_seed(7)
            .generate(&GenerationRequest::new(100, true, 80))
            .unwrap();

        assert_eq!(content.len(), 102);
        assert!(content[..80].iter().all(|b| in_char_range(*b)));
        assert_eq!(&content[80..82], b"\r\n");
        assert!(content[82..].iter().all(|b| in_char_range(*b)));
        assert_eq!(content[82..].len(), 20);
    }

    #[test]
    fn test_lines_are_exact_length_and_remainder_unterminated() {
        let content = ContentGenerator::with_seed(8)
            .generate(&GenerationRequest::new(250, true, 60))
            .unwrap();
        let text = std::str::from_utf8(&content).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert_eq!(lines.len(), 5);
        for line in &lines[..4] {
            assert_eq!(line.len(), 60);
        }
        assert_eq!(lines[4].len(), 10);
    }

    #[test]
    fn test_line_length_greater_than_size_is_one_unterminated_line() {
        let content = ContentGenerator::with_seed(9)
            .generate(&GenerationRequest::new(50, true, 80))
            .unwrap();
        assert_eq!(content.len(), 50);
        assert!(!content.contains(&b'\r'));
        assert!(!content.contains(&b'\n'));
    }

    #[test]
    fn test_line_length_equal_to_size_is_one_terminated_line() {
        let content = ContentGenerator::with_seed(10)
            .generate(&GenerationRequest::new(80, true, 80))
            .unwrap();
        assert_eq!(content.len(), 82);
        assert!(content.ends_with(b"\r\n"));
    }

    #[test]
    fn test_exact_multiple_has_no_remainder() {
        let layout = ContentLayout::plan(&GenerationRequest::new(240, true, 80)).unwrap();
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.remainder, 0);
        assert_eq!(layout.total, 246);
    }

    #[test]
    fn test_zero_size_is_empty() {
        let mut generator = ContentGenerator::with_seed(11);
        assert!(
            generator
                .generate(&GenerationRequest::new(0, false, 0))
                .unwrap()
                .is_empty()
        );
        assert!(
            generator
                .generate(&GenerationRequest::new(0, true, 80))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_same_seed_same_content() {
        let request = GenerationRequest::new(4096, true, 72);
        let a = ContentGenerator::with_seed(42).generate(&request).unwrap();
        let b = ContentGenerator::with_seed(42).generate(&request).unwrap();
        let c = ContentGenerator::with_seed(43).generate(&request).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_lines_are_not_repeated() {
        // one rng for the whole call, so consecutive lines differ
        let content = ContentGenerator::with_seed(12)
            .generate(&GenerationRequest::new(800, true, 80))
            .unwrap();
        let text = std::str::from_utf8(&content).unwrap();
        let lines: Vec<&str> = text.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.windows(2).all(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn test_oversized_request_is_out_of_range() {
        let request = GenerationRequest::new(u64::MAX, false, 0);
        let result = ContentGenerator::with_seed(13).generate(&request);
        assert!(matches!(
            result,
            Err(ContentError::OutOfRange { requested }) if requested == u64::MAX
        ));
    }

    #[test]
    fn test_overhead_overflow_is_out_of_range() {
        let size = isize::MAX as u64;
        let result = ContentLayout::plan(&GenerationRequest::new(size, true, 1));
        assert!(matches!(result, Err(ContentError::OutOfRange { .. })));
    }

    #[test]
    fn test_clone_shares_buffer() {
        let content = generate(&GenerationRequest::new(128, false, 0)).unwrap();
        let shared = content.clone();
        assert_eq!(content.as_bytes().as_ptr(), shared.as_bytes().as_ptr());
    }

    #[test]
    fn test_line_ending_parse() {
        assert_eq!("CRLF".parse::<LineEnding>().unwrap(), LineEnding::Crlf);
        assert_eq!(" lf ".parse::<LineEnding>().unwrap(), LineEnding::Lf);
        assert!("cr".parse::<LineEnding>().is_err());
    }
}
