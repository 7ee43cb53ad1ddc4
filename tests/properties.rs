use proptest::prelude::*;
use verteiler::convert::supported_pairs;
use verteiler::{Conversion, RedistributionMatrix};

fn pair() -> impl Strategy<Value = (usize, usize)> {
    let pairs: Vec<_> = supported_pairs().collect();
    proptest::sample::select(pairs)
}

fn frames_and_samples(src: usize) -> impl Strategy<Value = (usize, Vec<f32>)> {
    (1usize..256).prop_flat_map(move |frames| {
        (
            Just(frames),
            prop::collection::vec(-1.0f32..1.0, frames * src),
        )
    })
}

proptest! {
    #[test]
    fn silence_stays_silent((src, dst) in pair(), frames in 1usize..1024) {
        let conversion = Conversion::select(src, dst).unwrap();
        let mut buffer = vec![0.0; frames * src.max(dst)];
        conversion.apply_in_place(&mut buffer, frames);
        prop_assert!(buffer[..frames * dst].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn in_place_matches_separate_buffers(
        ((src, dst), (frames, input)) in pair().prop_flat_map(|(s, d)| (Just((s, d)), frames_and_samples(s)))
    ) {
        let conversion = Conversion::select(src, dst).unwrap();

        // run every step between two distinct buffers
        let mut current = input.clone();
        for kernel in conversion.steps() {
            let mut next = vec![0.0; frames * kernel.dst()];
            kernel.run(&current, &mut next, frames);
            current = next;
        }

        let mut buffer = vec![0.0; frames * src.max(dst)];
        buffer[..input.len()].copy_from_slice(&input);
        conversion.apply_in_place(&mut buffer, frames);

        prop_assert_eq!(&buffer[..frames * dst], &current[..frames * dst]);
    }

    #[test]
    fn layout_matrix_agrees_with_kernels(
        ((src, dst), (frames, input)) in pair().prop_flat_map(|(s, d)| (Just((s, d)), frames_and_samples(s)))
    ) {
        let conversion = Conversion::select(src, dst).unwrap();
        let mut matrix = RedistributionMatrix::for_layouts(src, dst).unwrap();

        let mut by_kernel = vec![0.0; frames * src.max(dst)];
        by_kernel[..input.len()].copy_from_slice(&input);
        let mut by_matrix = by_kernel.clone();

        conversion.apply_in_place(&mut by_kernel, frames);
        matrix.apply_in_place(&mut by_matrix, frames);

        for (k, m) in by_kernel[..frames * dst].iter().zip(&by_matrix[..frames * dst]) {
            prop_assert!((k - m).abs() < 1e-5, "{} vs {}", k, m);
        }
    }

    #[test]
    fn matrix_in_place_matches_reference(
        outputs in 1usize..10,
        inputs in 1usize..10,
        frames in 1usize..64,
        seed in any::<u32>(),
    ) {
        let coefficients: Vec<f32> = (0..outputs * inputs)
            .map(|i| ((i as u32).wrapping_mul(2_654_435_761).wrapping_add(seed) % 1000) as f32 / 1000.0)
            .collect();
        let input: Vec<f32> = (0..frames * inputs).map(|i| (i as f32 * 0.37).sin()).collect();

        let mut expected = vec![0.0; frames * outputs];
        for f in 0..frames {
            for o in 0..outputs {
                expected[f * outputs + o] = coefficients[o * inputs..(o + 1) * inputs]
                    .iter()
                    .zip(&input[f * inputs..(f + 1) * inputs])
                    .map(|(w, s)| w * s)
                    .sum();
            }
        }

        let mut matrix = RedistributionMatrix::new(outputs, inputs, &coefficients).unwrap();
        let mut buffer = vec![0.0; frames * outputs.max(inputs)];
        buffer[..input.len()].copy_from_slice(&input);
        matrix.apply_in_place(&mut buffer, frames);

        prop_assert_eq!(&buffer[..frames * outputs], &expected[..]);
    }
}
