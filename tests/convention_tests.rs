use graph_ops::{
    error::Error, times_output_rank, to_engine_axis, to_engine_layout, to_engine_shape, to_host_shape, ShapeArg,
};

fn sample_shapes() -> Vec<Vec<usize>> {
    vec![
        vec![1],
        vec![2, 3],
        vec![2, 2, 2],
        vec![7, 1, 4, 9],
        vec![0, 5],
        vec![3, 1, 4, 1, 5, 9, 2, 6],
    ]
}

#[test]
fn reversal_is_its_own_inverse() {
    for dims in sample_shapes() {
        let shape = ShapeArg::from(dims.clone());
        let once = to_engine_shape(&shape);
        let twice = to_engine_shape(&to_host_shape(&once));

        assert_eq!(to_host_shape(&once), shape);
        assert_eq!(twice, once);
        assert_eq!(to_host_shape(&twice).dims(), dims);
    }
}

#[test]
fn scalars_pass_through() {
    for n in [0usize, 1, 5, 1024] {
        let engine = to_engine_shape(&ShapeArg::from(n));
        assert_eq!(engine.scalar(), Some(n));
        assert_eq!(engine.dims(), None);
    }
}

#[test]
fn matrix_shape_scenario() {
    let engine = to_engine_shape(&ShapeArg::from([2usize, 3]));
    assert_eq!(engine.dims(), Some(&[3, 2][..]));
}

#[test]
fn palindromic_shape_still_reverses() {
    let engine = to_engine_shape(&ShapeArg::from([2usize, 2, 2]));
    assert_eq!(engine.dims(), Some(&[2, 2, 2][..]));

    let engine = to_engine_shape(&ShapeArg::from([1usize, 2, 3]));
    assert_eq!(engine.dims(), Some(&[3, 2, 1][..]));
}

#[test]
fn every_valid_axis_is_offset_by_one() {
    for rank in 1..=8usize {
        for axis in 0..rank {
            assert_eq!(to_engine_axis(axis as i64, rank).unwrap().get(), axis + 1);
        }
    }
}

#[test]
fn rank3_axis_scenarios() {
    assert_eq!(to_engine_axis(0, 3).unwrap().get(), 1);
    assert_eq!(to_engine_axis(2, 3).unwrap().get(), 3);
}

#[test]
fn out_of_range_axes_are_rejected() {
    for rank in 0..=4usize {
        let err = to_engine_axis(rank as i64, rank).unwrap_err();
        assert!(matches!(err, Error::AxisOutOfRange { .. }));
        assert!(err.to_string().contains(&format!("[0, {})", rank)));

        assert!(matches!(
            to_engine_axis(-1, rank),
            Err(Error::AxisOutOfRange { axis: -1, .. })
        ));
    }
}

#[test]
fn layout_pairs_shape_and_axis() {
    let layout = to_engine_layout(&"(4, 5, 6)".parse().unwrap(), 1).unwrap();
    assert_eq!(layout.shape().dims(), Some(&[6, 5, 4][..]));
    assert_eq!(layout.axis().get(), 2);
    assert_eq!(layout.axis().to_host_axis(), 1);

    assert!(to_engine_layout(&ShapeArg::from([4usize, 5]), 2).is_err());
}

#[test]
fn times_rank_adjustment_scenario() {
    // left (2,), right (2, 2), output_rank 1
    assert_eq!(times_output_rank(1, 1).unwrap(), 1);
    assert_eq!(times_output_rank(3, 1).unwrap(), 3);
    assert_eq!(times_output_rank(3, 3).unwrap(), 1);
    assert!(times_output_rank(2, 0).is_err());
    assert!(times_output_rank(2, 3).is_err());
}

#[test]
fn shape_arguments_parse_from_text_and_json() -> anyhow::Result<()> {
    assert_eq!("5".parse::<ShapeArg>()?, ShapeArg::Scalar(5));
    assert_eq!("(2, 3)".parse::<ShapeArg>()?, ShapeArg::from([2usize, 3]));
    assert_eq!("(3,)".parse::<ShapeArg>()?, ShapeArg::from([3usize]));
    assert_eq!("[2,3]".parse::<ShapeArg>()?, ShapeArg::from([2usize, 3]));
    assert_eq!("2x3".parse::<ShapeArg>()?, ShapeArg::from([2usize, 3]));

    assert_eq!(ShapeArg::from_json(&serde_json::json!(7))?, ShapeArg::Scalar(7));
    assert_eq!(ShapeArg::from_json(&serde_json::json!([4, 1]))?, ShapeArg::from([4usize, 1]));

    assert!(matches!("(2, -1)".parse::<ShapeArg>(), Err(Error::InvalidShape(_))));
    assert!(matches!(ShapeArg::from_json(&serde_json::json!("x")), Err(Error::InvalidShape(_))));
    Ok(())
}
