//! Exact permanents of square complex matrices.
//!
//! The permanent of an *n*×*n* matrix *M* is the determinant's sign-free
//! cousin,
//!
//! <blockquote>
//!   <p style="font-size:20px">
//!     perm(<i>M</i>)
//!       = Σ<sub><i>σ</i> ∈ <i>S</i><sub><i>n</i></sub></sub>
//!         Π<sub><i>i</i></sub> <i>M</i><sub><i>i</i>,<i>σ</i>(<i>i</i>)</sub>
//!   </p>
//! </blockquote>
//!
//! and, unlike the determinant, is #P-hard to compute exactly: no known
//! algorithm does better than exponential time for general matrices. It is
//! nevertheless the quantity that fixes output probabilities in
//! linear-optical (boson-sampling) experiments, so computing it exactly for
//! moderate *n* is a real workload.
//!
//! This crate implements the standard best-known exact method: Ryser's
//! inclusion–exclusion formula evaluated over all 2<sup>*n*</sup> column
//! subsets in binary-reflected Gray-code order, so that each subset's row
//! sums are obtained from the previous subset's in *O*(*n*) work. Total
//! runtime is *O*(2<sup>*n*</sup> *n*) with *O*(*n*) working space; see
//! [`permanent`][permanent::permanent] for details and for the
//! double-precision caveats that apply at large *n*.

pub mod gray;
pub mod permanent;
