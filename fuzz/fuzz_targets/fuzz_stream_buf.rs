#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use netstreambuf::{NetworkStreamBuf, NetworkStringBuf, NetworkVectorBuf, SeekOrigin, Storage};

#[derive(Debug, Arbitrary)]
enum Origin {
    Begin,
    Current,
    End,
}

impl From<Origin> for SeekOrigin {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Begin => SeekOrigin::Begin,
            Origin::Current => SeekOrigin::Current,
            Origin::End => SeekOrigin::End,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    PutByte(u8),
    PutSlice(Vec<u8>),
    Reserve(u16),
    GetByte,
    GetSlice(u8),
    Unget,
    SeekGet(i32, Origin),
    SeekPut(i32, Origin),
    SetDesired(u16),
    SetIncrement(u16),
    SetFactor(f32),
    /// Factor `1 + 2^-n`, reaching the smallest factor above one.
    SetFactorNearOne(u8),
    SetMax(u32),
    Take,
}

#[derive(Debug, Arbitrary)]
struct Input {
    string: bool,
    desired: u16,
    increment: u16,
    factor: f32,
    max: u32,
    ops: Vec<Op>,
}

fn run<S: Storage + std::fmt::Debug>(mut buf: NetworkStreamBuf<S>, ops: Vec<Op>) {
    let mut out = [0u8; 256];
    for op in ops {
        let before = buf.size();
        match op {
            Op::PutByte(b) => {
                if buf.put_byte(b).is_ok() {
                    assert_eq!(buf.size(), before + 1);
                    assert_eq!(buf.as_bytes().last(), Some(&b));
                } else {
                    assert_eq!(buf.size(), before);
                }
            }
            Op::PutSlice(bytes) => match buf.put_slice(&bytes) {
                Ok(n) => {
                    assert_eq!(n, bytes.len());
                    assert!(buf.as_bytes().ends_with(&bytes));
                    assert!(buf.capacity() >= buf.size());
                }
                Err(_) => assert_eq!(buf.size(), before),
            },
            Op::Reserve(n) => {
                let _ = buf.reserve(n.into());
            }
            Op::GetByte => {
                let at = buf.get_position();
                assert_eq!(buf.get_byte(), buf.as_bytes().get(at).copied());
            }
            Op::GetSlice(n) => {
                let want = usize::from(n).min(buf.available());
                assert_eq!(buf.get_slice(&mut out[..usize::from(n)]), want);
            }
            Op::Unget => {
                let _ = buf.unget_byte();
            }
            Op::SeekGet(offset, origin) => {
                if let Ok(p) = buf.seek_get(offset.into(), origin.into()) {
                    assert_eq!(p, buf.get_position());
                }
            }
            Op::SeekPut(offset, origin) => {
                if let Ok(p) = buf.seek_put(offset.into(), origin.into()) {
                    assert_eq!(p, buf.size());
                }
            }
            Op::SetDesired(n) => {
                let _ = buf.set_desired_size(n.into());
            }
            Op::SetIncrement(n) => {
                let _ = buf.set_size_increment(n.into());
            }
            Op::SetFactor(f) => {
                let _ = buf.set_grow_factor(f.into());
            }
            Op::SetFactorNearOne(n) => {
                let mut step = 1.0_f64;
                for _ in 0..=n % 52 {
                    step /= 2.0;
                }
                assert_eq!(buf.set_grow_factor(1.0 + step), Ok(()));
            }
            Op::SetMax(n) => {
                let _ = buf.set_max_size(n as usize);
            }
            Op::Take => {
                let taken = buf.take();
                assert!(taken.invariants_hold());
                assert_eq!(buf.size(), 0);
                buf = taken;
            }
        }
        assert!(buf.size() >= before || matches!(buf.size(), 0));
        assert!(buf.invariants_hold(), "{buf:?}");
    }
}

fuzz_target!(|input: Input| {
    let max = input.max as usize % (1 << 20);
    if input.string {
        let buf = if input.increment > 0 {
            NetworkStringBuf::with_increment(input.desired.into(), input.increment.into(), max)
        } else {
            NetworkStringBuf::with_grow_factor(input.desired.into(), input.factor.into(), max)
        };
        run(buf, input.ops);
    } else {
        let buf = if input.increment > 0 {
            NetworkVectorBuf::with_increment(input.desired.into(), input.increment.into(), max)
        } else {
            NetworkVectorBuf::with_grow_factor(input.desired.into(), input.factor.into(), max)
        };
        run(buf, input.ops);
    }
});
