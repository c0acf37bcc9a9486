mod galois;

pub(crate) use galois::G;

// Generator polynomial
//------------------------------------------------------------------------------

/// Degree-n polynomial (x - 2^0)(x - 2^1)...(x - 2^(n-1)) over GF(256),
/// highest-order term first. Subtraction and addition coincide in the field,
/// so each factor is stored as [1, 2^e].
pub(crate) fn generator_polynomial(ec_len: usize) -> Vec<G> {
    debug_assert!(ec_len >= 1, "Generator polynomial needs at least one root");

    let mut gen = vec![G::ONE];
    for e in 0..ec_len {
        gen = multiply_polynomials(&gen, &[G::ONE, G::gen_pow(e)]);
    }
    gen
}

fn multiply_polynomials(p1: &[G], p2: &[G]) -> Vec<G> {
    let mut res = vec![G::ZERO; p1.len() + p2.len() - 1];
    for (i, &a) in p1.iter().enumerate() {
        for (j, &b) in p2.iter().enumerate() {
            res[i + j] += a * b;
        }
    }
    res
}

#[cfg(test)]
mod generator_polynomial_tests {
    use super::{generator_polynomial, multiply_polynomials, G};

    #[test]
    fn test_degree_one() {
        assert_eq!(generator_polynomial(1), [G(1), G(1)]);
    }

    #[test]
    fn test_degree_two() {
        // (x - 1)(x - 2) = x^2 + 3x + 2
        assert_eq!(generator_polynomial(2), [G(1), G(3), G(2)]);
    }

    #[test]
    fn test_degree_ten() {
        let exp_coeffs =
            [1u8, 216, 194, 159, 111, 199, 94, 95, 113, 157, 193].map(G);
        assert_eq!(generator_polynomial(10), exp_coeffs);
    }

    #[test]
    fn test_multiply_by_constant_one() {
        let poly = [G(5), G(0), G(200)];
        assert_eq!(multiply_polynomials(&poly, &[G::ONE]), poly);
    }
}

// Block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Block {
    data: [u8; MAX_BLOCK_SIZE],
    // Block length
    len: usize,
    // Data length
    dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], len: usize) -> Self {
        let dlen = raw.len();
        debug_assert!(len <= MAX_BLOCK_SIZE, "Block length exceeds maximum: {len}");
        debug_assert!(0 < dlen && dlen < len, "Invalid data length: Data {dlen}, Block {len}");

        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..dlen].copy_from_slice(raw);
        let mut block = Self { data, len, dlen };
        block.compute_ecc();
        block
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn ec_len(&self) -> usize {
        self.len - self.dlen
    }

    #[cfg(test)]
    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn full(&self) -> &[u8] {
        &self.data[..self.len]
    }

    #[cfg(test)]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    #[cfg(test)]
    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..self.len]
    }

    // Polynomial long division of the message polynomial (shifted left by
    // the ec length) by the generator polynomial. One elimination step per
    // data codeword; the remainder is the ec codewords.
    fn compute_ecc(&mut self) {
        let gen = generator_polynomial(self.ec_len());

        let mut rem = [G::ZERO; MAX_BLOCK_SIZE];
        for (r, &d) in rem.iter_mut().zip(self.data[..self.dlen].iter()) {
            *r = G(d);
        }

        for i in 0..self.dlen {
            let lead = rem[i];
            if lead == G::ZERO {
                continue;
            }
            for (j, &g) in gen.iter().enumerate() {
                rem[i + j] += g * lead;
            }
        }

        for (d, &r) in self.data[self.dlen..self.len].iter_mut().zip(rem[self.dlen..].iter()) {
            *d = r.into();
        }
    }
}


// Global constants
//------------------------------------------------------------------------------

pub(crate) const MAX_BLOCK_SIZE: usize = 256;
