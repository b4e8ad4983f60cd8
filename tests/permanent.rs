use ndarray as nd;
use num_complex::Complex64 as C64;
use rand::{ Rng, SeedableRng, rngs::StdRng };
use ryser::permanent::{
    PermanentError,
    permanent,
    permanent_naive,
    permanent_par,
    permanent_par_cpus,
};

fn random_matrix(n: usize, rng: &mut StdRng) -> nd::Array2<C64> {
    nd::Array2::from_shape_fn(
        (n, n),
        |_| C64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
    )
}

fn assert_close(a: C64, b: C64, tol: f64) {
    let scale = b.norm().max(1.0);
    assert!(
        (a - b).norm() < tol * scale,
        "{} != {} (tol {:e})", a, b, tol,
    );
}

#[test]
fn identity_matrix_has_unit_permanent() {
    for n in 0..=8 {
        let eye: nd::Array2<C64> = nd::Array2::eye(n);
        assert_close(permanent(&eye).unwrap(), C64::new(1.0, 0.0), 1e-12);
    }
}

#[test]
fn all_ones_matrix_gives_factorial() {
    let mut factorial = 1.0;
    for n in 1..=8 {
        factorial *= n as f64;
        let ones = nd::Array2::from_elem((n, n), C64::new(1.0, 0.0));
        assert_close(permanent(&ones).unwrap(), C64::new(factorial, 0.0), 1e-12);
    }
}

#[test]
fn zero_row_kills_the_permanent() {
    let mut rng = StdRng::seed_from_u64(10057);
    let mut mat = random_matrix(6, &mut rng);
    mat.row_mut(2).fill(C64::new(0.0, 0.0));
    assert_close(permanent(&mat).unwrap(), C64::new(0.0, 0.0), 1e-12);
}

#[test]
fn zero_column_kills_the_permanent() {
    let mut rng = StdRng::seed_from_u64(10057);
    let mut mat = random_matrix(6, &mut rng);
    mat.column_mut(4).fill(C64::new(0.0, 0.0));
    assert_close(permanent(&mat).unwrap(), C64::new(0.0, 0.0), 1e-12);
}

#[test]
fn empty_matrix_has_permanent_one() {
    let empty: nd::Array2<C64> = nd::Array2::zeros((0, 0));
    assert_close(permanent(&empty).unwrap(), C64::new(1.0, 0.0), 1e-15);
    assert_close(permanent_naive(&empty).unwrap(), C64::new(1.0, 0.0), 1e-15);
}

#[test]
fn single_entry_matrix_returns_the_entry() {
    let entry = C64::new(0.25, -1.5);
    let mat = nd::Array2::from_elem((1, 1), entry);
    assert_close(permanent(&mat).unwrap(), entry, 1e-15);
}

#[test]
fn real_scalars_work_too() {
    let mat = nd::arr2(&[[1.0_f64, 2.0], [3.0, 4.0]]);
    // 1*4 + 2*3
    assert!((permanent(&mat).unwrap() - 10.0).abs() < 1e-12);
}

#[test]
fn non_square_input_is_rejected() {
    let mat: nd::Array2<C64> = nd::Array2::zeros((3, 4));
    assert!(matches!(
        permanent(&mat),
        Err(PermanentError::InvalidShape(3, 4)),
    ));
    assert!(matches!(
        permanent_naive(&mat),
        Err(PermanentError::InvalidShape(3, 4)),
    ));
    assert!(matches!(
        permanent_par(&mat, 4),
        Err(PermanentError::InvalidShape(3, 4)),
    ));
}

#[test]
fn pointer_width_order_is_rejected() {
    // 2^n subsets no longer fit the usize bitmask at this order
    let n = usize::BITS as usize;
    let mat: nd::Array2<C64> = nd::Array2::zeros((n, n));
    assert!(matches!(
        permanent(&mat),
        Err(PermanentError::Oversize(m)) if m == n,
    ));
    assert!(matches!(
        permanent_par(&mat, 4),
        Err(PermanentError::Oversize(m)) if m == n,
    ));
}

#[test]
fn matches_the_defining_sum_over_permutations() {
    let mut rng = StdRng::seed_from_u64(20117);
    for n in 2..=6 {
        let mat = random_matrix(n, &mut rng);
        let fast = permanent(&mat).unwrap();
        let slow = permanent_naive(&mat).unwrap();
        assert_close(fast, slow, 1e-9);
    }
}

#[test]
fn invariant_under_row_and_column_permutations() {
    let mut rng = StdRng::seed_from_u64(30089);
    let mat = random_matrix(6, &mut rng);
    let before = permanent(&mat).unwrap();
    let shuffled
        = mat.select(nd::Axis(0), &[3, 0, 5, 1, 4, 2])
        .select(nd::Axis(1), &[2, 4, 0, 5, 3, 1]);
    assert_close(permanent(&shuffled).unwrap(), before, 1e-9);
}

#[test]
fn parallel_evaluation_matches_serial() {
    let mut rng = StdRng::seed_from_u64(40013);
    let mat = random_matrix(10, &mut rng);
    let serial = permanent(&mat).unwrap();
    for nthreads in [1, 2, 3, 4, 7] {
        assert_close(permanent_par(&mat, nthreads).unwrap(), serial, 1e-9);
    }
    assert_close(permanent_par_cpus(&mat).unwrap(), serial, 1e-9);
}

#[test]
fn parallel_thread_count_is_clamped_to_the_step_count() {
    let mut rng = StdRng::seed_from_u64(50021);
    let mat = random_matrix(2, &mut rng);
    let serial = permanent(&mat).unwrap();
    // 2^2 = 4 steps, far fewer than the requested thread count
    assert_close(permanent_par(&mat, 64).unwrap(), serial, 1e-12);
}
