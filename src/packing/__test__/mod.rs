use crate::packing::types::Parameter;
use rand::Rng;


/// 임의의 비트 길이를 가진 파라미터 목록 생성
pub(crate) fn random_parameters(rng: &mut impl Rng, count: usize) -> Vec<Parameter> {
    (0..count)
        .map(|i| {
            let minimum = rng.gen_range(-100.0..100.0);
            let range = rng.gen_range(0.001..500.0);
            Parameter::new(
                format!("p{}", i),
                rng.gen_range(1..=32),
                minimum,
                minimum + range,
            )
        })
        .collect()
}

#[test]
fn test_layout_density() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let count = rng.gen_range(0..12);
        let params = random_parameters(&mut rng, count);
        let word_width = rng.gen_range(1..=32);
        let plan = crate::packing::plan(&params, word_width).unwrap();

        let mut cursor = 0;
        for (offset, param) in plan.offsets.iter().zip(&params) {
            assert_eq!(offset.from, cursor, "오프셋이 연속적이지 않음");
            assert_eq!(offset.to - offset.from, param.bit_length);
            cursor = offset.to;
        }
        let sum: u32 = params.iter().map(|p| p.bit_length).sum();
        assert_eq!(plan.total_bits, sum);
        assert_eq!(
            plan.word_count,
            ((sum + word_width - 1) / word_width) as usize
        );
        assert_eq!(plan.word_count == 0, params.is_empty());
    }
}
