//! The permanent engine: exact evaluation of matrix permanents via Ryser's
//! formula with Gray-code subset enumeration.
//!
//! Ryser's identity rewrites the permanent's sum over *n*! permutations as an
//! inclusion–exclusion sum over the 2<sup>*n*</sup> subsets *S* of the column
//! set,
//!
//! <blockquote>
//!   <p style="font-size:20px">
//!     perm(<i>M</i>)
//!       = (−1)<sup><i>n</i></sup>
//!         Σ<sub><i>S</i></sub> (−1)<sup>|<i>S</i>|</sup>
//!         Π<sub><i>i</i></sub> [
//!           Σ<sub><i>j</i> ∈ <i>S</i></sub>
//!           <i>M</i><sub><i>i</i>,<i>j</i></sub>
//!         ]
//!   </p>
//! </blockquote>
//!
//! Enumerating the subsets in Gray-code order means each subset differs from
//! its predecessor by a single column, so the vector of per-row sums is
//! maintained with one *O*(*n*) column update per subset instead of being
//! rebuilt from scratch. All working state (row sums, sign, running total) is
//! owned by a single call; the functions here are pure and safe to invoke
//! concurrently on different matrices.

use std::ops::Range;
use itertools::Itertools;
use ndarray as nd;
use num_complex::ComplexFloat;
use num_traits::{ One, Zero };
use thiserror::Error;
use crate::gray;

#[derive(Debug, Error)]
pub enum PermanentError {
    /// Returned when the input matrix is not square.
    #[error("invalid shape: expected a square matrix, got {0}x{1}")]
    InvalidShape(usize, usize),

    /// Returned when the matrix order is too large for column subsets to be
    /// indexed by a `usize` bitmask.
    #[error("matrix order {0} exceeds the pointer-width subset bitmask")]
    Oversize(usize),
}
use PermanentError::*;
pub type PermanentResult<T> = Result<T, PermanentError>;

/// Compute the permanent of a square matrix exactly, using Ryser's formula
/// with Gray-code subset enumeration.
///
/// Runtime is *O*(2<sup>*n*</sup> *n*) and working space is *O*(*n*) beyond
/// the input; this exponential cost is inherent to exact permanent
/// computation (the problem is #P-hard). The input is only read, never
/// mutated, and the call holds no state across invocations.
///
/// The returned value follows the literature convention, i.e. it includes
/// Ryser's final (−1)<sup><i>n</i></sup> factor, and agrees with the defining
/// sum over permutations (see [`permanent_naive`]).
///
/// # Precision
///
/// The inclusion–exclusion sum alternates signs over 2<sup>*n*</sup> terms,
/// so results suffer catastrophic cancellation as *n* grows; beyond roughly
/// *n* = 25–30 in double precision, significant digits are lost. No cheaper
/// stabilization of the classical algorithm is known, so this is documented
/// rather than detected.
///
/// # Errors
///
/// Fails with [`PermanentError::InvalidShape`] if the matrix is not square,
/// before any enumeration work; the degenerate 0×0 matrix is valid and has
/// permanent 1.
pub fn permanent<A>(mat: &nd::Array2<A>) -> PermanentResult<A>
where A: ComplexFloat
{
    let n = check_square(mat)?;
    let nsubsets: usize = 1 << n;
    let total = ryser_partial(mat, 0..nsubsets, nsubsets);
    Ok(if n & 1 == 1 { -total } else { total })
}

/// Compute the permanent directly from its definition as a sum over all *n*!
/// permutations.
///
/// Runtime is *O*(*n*! *n*); this exists as the reference implementation to
/// cross-check [`permanent`] against for small *n*, and is hopeless beyond
/// *n* ≈ 10.
///
/// # Errors
///
/// Fails with [`PermanentError::InvalidShape`] if the matrix is not square.
pub fn permanent_naive<A>(mat: &nd::Array2<A>) -> PermanentResult<A>
where A: ComplexFloat
{
    let n = check_square(mat)?;
    let total: A
        = (0..n).permutations(n)
        .map(|sigma| {
            sigma.iter().enumerate()
                .map(|(i, &j)| mat[[i, j]])
                .fold(A::one(), |acc, elem| acc * elem)
        })
        .fold(A::zero(), |acc, term| acc + term);
    Ok(total)
}

/// Like [`permanent`], but with the subset enumeration partitioned across
/// `nthreads` threads.
///
/// Each thread takes a contiguous chunk of the 2<sup>*n*</sup> enumeration
/// steps, re-derives the row sums for its chunk's first subset directly
/// (*O*(*n*<sup>2</sup>) once per chunk), walks the chunk with the usual
/// incremental updates, and the per-chunk partial sums are combined at the
/// end. The result equals the serial one up to floating-point associativity.
///
/// `nthreads` is clamped to at least 1 and at most the number of enumeration
/// steps.
///
/// # Errors
///
/// Fails with [`PermanentError::InvalidShape`] if the matrix is not square.
pub fn permanent_par<A>(mat: &nd::Array2<A>, nthreads: usize)
    -> PermanentResult<A>
where A: ComplexFloat + Send + Sync
{
    let n = check_square(mat)?;
    let nsubsets: usize = 1 << n;
    let nthreads = nthreads.clamp(1, nsubsets);
    if nthreads == 1 {
        let total = ryser_partial(mat, 0..nsubsets, nsubsets);
        return Ok(if n & 1 == 1 { -total } else { total });
    }
    let chunk = (nsubsets + nthreads - 1) / nthreads;
    let total: A
        = crossbeam::thread::scope(|scope| {
            let mut workers = Vec::with_capacity(nthreads);
            for t in 0..nthreads {
                let start = (t * chunk).min(nsubsets);
                let end = ((t + 1) * chunk).min(nsubsets);
                workers.push(
                    scope.spawn(move |_| {
                        ryser_partial(mat, start..end, nsubsets)
                    })
                );
            }
            workers.into_iter()
                .map(|th| th.join().expect("permanent worker panicked"))
                .fold(A::zero(), |acc, part| acc + part)
        })
        .expect("permanent worker panicked");
    Ok(if n & 1 == 1 { -total } else { total })
}

/// Like [`permanent_par`], but with the number of threads equal to the number
/// of logical CPU cores available in the current system.
pub fn permanent_par_cpus<A>(mat: &nd::Array2<A>) -> PermanentResult<A>
where A: ComplexFloat + Send + Sync
{
    permanent_par(mat, num_cpus::get())
}

/// Verify squareness and bitmask representability, returning the matrix
/// order.
fn check_square<A>(mat: &nd::Array2<A>) -> PermanentResult<usize> {
    let (rows, cols) = mat.dim();
    if rows != cols { return Err(InvalidShape(rows, cols)); }
    if rows >= usize::BITS as usize { return Err(Oversize(rows)); }
    Ok(rows)
}

/// Evaluate the raw Ryser sum Σ_S (−1)^|S| Π_i (row sum)_i over the
/// enumeration steps in `steps`, where step `k` visits the subset with
/// bitmask `gray::code(k)`; `period` is the total number of steps, 2^n.
///
/// The final (−1)^n factor is *not* applied here so that partial sums from
/// disjoint step ranges can be added directly.
fn ryser_partial<A>(mat: &nd::Array2<A>, steps: Range<usize>, period: usize)
    -> A
where A: ComplexFloat
{
    let mut subset = gray::code(steps.start);
    let mut row_sums = subset_row_sums(mat, subset);
    // a single column flips per step, so |S| has the parity of k
    let mut negative = steps.start & 1 == 1;
    let mut total = A::zero();
    for k in steps {
        let term: A
            = row_sums.iter().copied()
            .fold(A::one(), |acc, sum| acc * sum);
        total = if negative { total - term } else { total + term };
        let next = gray::code((k + 1) % period);
        if let Some((col, on)) = gray::flip_between(subset, next) {
            apply_column(&mut row_sums, mat, col, on);
            negative = !negative;
            subset = next;
        }
    }
    total
}

/// Build the row-sum accumulator for an arbitrary starting subset: entry `i`
/// is Σ_{j ∈ subset} M[i][j].
fn subset_row_sums<A>(mat: &nd::Array2<A>, subset: usize) -> Vec<A>
where A: ComplexFloat
{
    let n = mat.ncols();
    let mut sums: Vec<A> = vec![A::zero(); n];
    (0..n).filter(|col| subset >> col & 1 == 1)
        .for_each(|col| { apply_column(&mut sums, mat, col, true); });
    sums
}

/// Add (`on == true`) or subtract (`on == false`) column `col` of `mat` from
/// the row-sum accumulator, elementwise.
fn apply_column<A>(sums: &mut [A], mat: &nd::Array2<A>, col: usize, on: bool)
where A: ComplexFloat
{
    if on {
        sums.iter_mut().zip(mat.column(col))
            .for_each(|(sum, elem)| { *sum = *sum + *elem; });
    } else {
        sums.iter_mut().zip(mat.column(col))
            .for_each(|(sum, elem)| { *sum = *sum - *elem; });
    }
}
