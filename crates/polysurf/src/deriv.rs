//! Analytic gradient and Hessian of a [Surface], using the power rule on the
//! integer exponents. Every term is checked against [THR] *before* any power
//! is taken, so a structurally-zero derivative never evaluates `x^-1` or
//! `x^-2`.

use crate::{Dmat, Dvec, Surface, THR};

impl Surface<'_> {
    /// the product of `x[k]^e[k, j]` over every variable `k` not in `skip`
    #[inline]
    fn rest(&self, x: &Dvec, j: usize, skip: &[usize]) -> f64 {
        let mut prod = 1.0;
        for (k, xk) in x.iter().enumerate() {
            if skip.contains(&k) {
                continue;
            }
            let ekj = self.exponents[(k, j)];
            if ekj != 0 {
                prod *= xk.powi(ekj);
            }
        }
        prod
    }

    /// compute the gradient of the function at `x`
    pub fn grad(&self, x: &Dvec) -> Dvec {
        let (nvbl, nunk) = self.exponents.shape();
        let mut grad = Dvec::zeros(nvbl);
        for i in 0..nvbl {
            let mut sum = 0.0;
            for j in 0..nunk {
                let eij = self.exponents[(i, j)];
                let mut coj = self.coeffs[j] * eij as f64;
                if coj.abs() < THR {
                    continue;
                }
                if eij != 1 {
                    coj *= x[i].powi(eij - 1);
                }
                sum += coj * self.rest(x, j, &[i]);
            }
            grad[i] = sum;
        }
        grad
    }

    /// compute the Hessian of the function at `x`. only the lower triangle is
    /// computed, and it is mirrored into the upper one
    pub fn hess(&self, x: &Dvec) -> Dmat {
        let (nvbl, nunk) = self.exponents.shape();
        let mut hess = Dmat::zeros(nvbl, nvbl);
        for i in 0..nvbl {
            for l in 0..=i {
                let mut sum = 0.0;
                if i != l {
                    // off-diagonal
                    for j in 0..nunk {
                        let eij = self.exponents[(i, j)];
                        let elj = self.exponents[(l, j)];
                        let mut coj = self.coeffs[j] * (eij * elj) as f64;
                        if coj.abs() < THR {
                            continue;
                        }
                        if eij != 1 {
                            coj *= x[i].powi(eij - 1);
                        }
                        if elj != 1 {
                            coj *= x[l].powi(elj - 1);
                        }
                        sum += coj * self.rest(x, j, &[i, l]);
                    }
                    hess[(l, i)] = sum;
                } else {
                    // diagonal
                    for j in 0..nunk {
                        let eij = self.exponents[(i, j)];
                        let mut coj = self.coeffs[j] * (eij * (eij - 1)) as f64;
                        if coj.abs() < THR {
                            continue;
                        }
                        if eij != 2 {
                            coj *= x[i].powi(eij - 2);
                        }
                        sum += coj * self.rest(x, j, &[i]);
                    }
                }
                hess[(i, l)] = sum;
            }
        }
        hess
    }
}
